// Copyright (c) 2022 Bastiaan Marinus van de Weerd

mod day04;


#[derive(Debug, thiserror::Error)]
enum Error {
	#[error("usage: advent25 <day> <part> [input]")]
	Usage,
	#[error("no solution for day {day} part {part}")]
	Unsolved { day: u32, part: u32 },
	#[error("reading {path}: {source}")]
	Input { path: String, source: std::io::Error },
	#[error(transparent)]
	Grid(#[from] day04::GridError),
}


macro_rules! solve { ( $day:expr, $part:expr, $input:expr; $( $d:literal ),+ ) => {
	paste::paste! { match ($day, $part) {
		$(
			($d, 1) => [<day $d>]::part1($input)?.to_string(),
			($d, 2) => [<day $d>]::part2($input)?.to_string(),
		)+
		(day, part) => return Err(Error::Unsolved { day, part }),
	} }
} }


fn run(args: impl IntoIterator<Item = String>) -> Result<String, Error> {
	let mut args = args.into_iter();
	let (Some(day), Some(part)) = (args.next(), args.next()) else { return Err(Error::Usage) };
	let (Ok(day), Ok(part)) = (day.parse::<u32>(), part.parse::<u32>()) else { return Err(Error::Usage) };

	let path = args.next().unwrap_or_else(|| format!("input/day{day:02}.txt"));
	let input = std::fs::read_to_string(&path)
		.map_err(|source| Error::Input { path, source })?;

	Ok(solve!(day, part, &input; 04))
}


fn main() {
	match run(std::env::args().skip(1)) {
		Ok(answer) => println!("{answer}"),
		Err(err) => {
			eprintln!("{err}");
			std::process::exit(1)
		}
	}
}


#[test]
fn tests() {
	fn args(args: &[&str]) -> Vec<String> {
		args.iter().map(|&a| a.to_owned()).collect()
	}

	assert_eq!(run(args(&["4"])).unwrap_err().to_string(), "usage: advent25 <day> <part> [input]");
	assert!(matches!(run(args(&["four", "1"])), Err(Error::Usage)));

	let missing = std::env::temp_dir().join("advent25-missing-day04.txt");
	let err = run(args(&["4", "1", missing.to_str().unwrap()])).unwrap_err();
	assert!(err.to_string().starts_with(&format!("reading {}: ", missing.display())));

	let path = std::env::temp_dir().join(format!("advent25-day04-{}.txt", std::process::id()));
	let path_str = path.to_str().unwrap();

	std::fs::write(&path, "@@\n@\n").unwrap();
	assert_eq!(run(args(&["4", "2", path_str])).unwrap_err().to_string(), "line 2 has 1 cells, expected 2");

	std::fs::write(&path, "@@.\n@@.\n").unwrap();
	assert_eq!(run(args(&["4", "1", path_str])).unwrap(), "4");
	assert_eq!(run(args(&["4", "2", path_str])).unwrap(), "4");
	assert_eq!(run(args(&["5", "1", path_str])).unwrap_err().to_string(), "no solution for day 5 part 1");
	assert_eq!(run(args(&["4", "3", path_str])).unwrap_err().to_string(), "no solution for day 4 part 3");

	std::fs::remove_file(&path).unwrap();
}
