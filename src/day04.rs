// Copyright (c) 2022 Bastiaan Marinus van de Weerd

use cascade::{Cascade, Rules};
pub(crate) use parsing::GridError;


/// Rectangular occupancy grid (`@` is a roll of paper, `.` is empty), row-major.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct Grid {
	cells: Vec<bool>,
	cols: usize,
}

impl Grid {
	pub(crate) fn rows(&self) -> usize {
		self.cells.len() / self.cols
	}

	pub(crate) fn cols(&self) -> usize {
		self.cols
	}

	/// Off-grid positions are empty.
	pub(crate) fn is_occupied(&self, [row, col]: [usize; 2]) -> bool {
		row < self.rows() && col < self.cols && self.cells[row * self.cols + col]
	}

	#[cfg(any(test, LOGGING))]
	pub(crate) fn occupied_count(&self) -> usize {
		self.cells.iter().filter(|&&c| c).count()
	}
}

#[cfg(any(test, LOGGING))]
impl std::fmt::Display for Grid {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use std::fmt::Write;
		for (r, row) in self.cells.chunks(self.cols).enumerate() {
			if r > 0 { f.write_char('\n')? }
			for &cell in row { f.write_char(if cell { '@' } else { '.' })? }
		}
		Ok(())
	}
}


#[cfg_attr(not(test), allow(dead_code))]
pub(crate) mod cascade {
	use super::Grid;

	/// `[row, column]` displacement from a cell to one of its neighbors.
	pub(crate) type Offset = [isize; 2];

	/// Largest offset component; bounds the sentinel border width.
	pub(crate) const MAX_REACH: usize = u8::MAX as usize;

	#[derive(Clone, Debug, PartialEq, Eq)]
	pub(crate) struct Neighborhood(Vec<Offset>);

	impl Neighborhood {
		/// The 8 horizontally, vertically, and diagonally adjacent cells.
		pub(crate) fn moore() -> Self {
			Neighborhood(itertools::iproduct!(-1..=1, -1..=1)
				.filter(|&d| d != (0, 0))
				.map(|(dr, dc)| [dr, dc])
				.collect())
		}

		pub(crate) fn von_neumann() -> Self {
			Neighborhood(vec![[-1, 0], [0, -1], [0, 1], [1, 0]])
		}

		pub(crate) fn try_from_offsets(offsets: impl IntoIterator<Item = Offset>) -> Result<Self, RulesError> {
			use itertools::Itertools as _;

			let offsets = offsets.into_iter().collect::<Vec<_>>();
			if offsets.is_empty() { return Err(RulesError::EmptyNeighborhood) }
			if offsets.contains(&[0, 0]) { return Err(RulesError::SelfOffset) }
			if let Some(&offset) = offsets.iter().duplicates().next() {
				return Err(RulesError::DuplicateOffset(offset))
			}
			if offsets.len() > u8::MAX as usize { return Err(RulesError::TooManyOffsets(offsets.len())) }
			if let Some(&offset) = offsets.iter()
					.find(|offset| offset.iter().any(|d| d.unsigned_abs() > MAX_REACH)) {
				return Err(RulesError::OffsetTooLarge(offset))
			}
			Ok(Neighborhood(offsets))
		}

		pub(crate) fn offsets(&self) -> &[Offset] {
			&self.0
		}

		/// Width of the empty border needed to keep every offset in bounds.
		fn radius(&self) -> usize {
			self.0.iter()
				.flat_map(|offset| offset.iter().map(|d| d.unsigned_abs()))
				.max()
				.unwrap_or(0)
		}
	}

	/// Which pending cell the worklist hands out next.
	#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
	pub(crate) enum Order {
		#[default]
		Lifo,
		Fifo,
	}

	#[derive(Clone, Debug)]
	pub(crate) struct Rules {
		neighborhood: Neighborhood,
		threshold: u8,
		order: Order,
	}

	impl Rules {
		/// Cells with fewer than `threshold` occupied neighbors get removed.
		pub(crate) fn new(neighborhood: Neighborhood, threshold: u8, order: Order) -> Result<Self, RulesError> {
			if threshold == 0 { return Err(RulesError::ZeroThreshold) }
			Ok(Rules { neighborhood, threshold, order })
		}
	}

	impl Default for Rules {
		fn default() -> Self {
			Rules { neighborhood: Neighborhood::moore(), threshold: 4, order: Order::Lifo }
		}
	}

	#[derive(Debug, PartialEq, Eq, thiserror::Error)]
	pub(crate) enum RulesError {
		#[error("neighborhood has no offsets")]
		EmptyNeighborhood,
		#[error("neighborhood contains the cell itself")]
		SelfOffset,
		#[error("neighborhood contains offset {0:?} more than once")]
		DuplicateOffset(Offset),
		#[error("neighborhood has {0} offsets, more than a count can hold")]
		TooManyOffsets(usize),
		#[error("neighborhood offset {0:?} reaches further than {} cells", MAX_REACH)]
		OffsetTooLarge(Offset),
		#[error("threshold must be at least 1")]
		ZeroThreshold,
	}

	/// Hooks into a cascade run; positions are `[row, column]` in the unpadded grid.
	pub(crate) trait Observer {
		/// The cell was marked removed and is waiting in the worklist.
		fn queued(&mut self, _cell: [usize; 2]) {}
		/// An occupied cell lost a neighbor.
		fn recounted(&mut self, _cell: [usize; 2], _count: u8) {}
		/// The cell left the worklist; `total` includes it.
		fn removed(&mut self, _cell: [usize; 2], _total: usize) {}
	}

	impl Observer for () {}

	/// Removal engine over a flat buffer with an empty sentinel border `pad` cells wide.
	pub(crate) struct Cascade {
		occupied: Vec<bool>,
		counts: Vec<u8>,
		deltas: Vec<isize>,
		rows: usize,
		cols: usize,
		pad: usize,
		stride: usize,
		threshold: u8,
		order: Order,
		removed: usize,
	}

	impl Cascade {
		pub(crate) fn new(grid: &Grid, rules: &Rules) -> Self {
			let (rows, cols) = (grid.rows(), grid.cols());
			let pad = rules.neighborhood.radius();
			let stride = cols + 2 * pad;
			let len = (rows + 2 * pad) * stride;

			let deltas = rules.neighborhood.0.iter()
				.map(|&[dr, dc]| dr * stride as isize + dc)
				.collect();

			let mut cascade = Cascade {
				occupied: vec![false; len],
				counts: vec![0; len],
				deltas,
				rows,
				cols,
				pad,
				stride,
				threshold: rules.threshold,
				order: rules.order,
				removed: 0,
			};

			for (row, col) in itertools::iproduct!(0..rows, 0..cols) {
				let pos = cascade.pos([row, col]);
				cascade.occupied[pos] = grid.is_occupied([row, col]);
			}

			// All counts come from the untouched occupancy; nothing is removed before `run`.
			for pos in cascade.interior() {
				if !cascade.occupied[pos] { continue }
				let count = cascade.deltas.iter()
					.filter(|&&delta| cascade.occupied[pos.wrapping_add_signed(delta)])
					.count();
				cascade.counts[pos] = count as u8;
			}

			cascade
		}

		fn interior(&self) -> impl Iterator<Item = usize> {
			let (pad, stride) = (self.pad, self.stride);
			itertools::iproduct!(pad..pad + self.rows, pad..pad + self.cols)
				.map(move |(r, c)| r * stride + c)
		}

		fn pos(&self, [row, col]: [usize; 2]) -> usize {
			(row + self.pad) * self.stride + col + self.pad
		}

		fn cell(&self, pos: usize) -> [usize; 2] {
			[pos / self.stride - self.pad, pos % self.stride - self.pad]
		}

		/// Stored neighbor count of a still occupied cell.
		pub(crate) fn count_at(&self, [row, col]: [usize; 2]) -> Option<u8> {
			if row >= self.rows || col >= self.cols { return None }
			let pos = self.pos([row, col]);
			self.occupied[pos].then_some(self.counts[pos])
		}

		/// Occupied cells that are currently below the threshold.
		pub(crate) fn accessible(&self) -> impl Iterator<Item = [usize; 2]> + '_ {
			self.interior()
				.filter(move |&pos| self.occupied[pos] && self.counts[pos] < self.threshold)
				.map(move |pos| self.cell(pos))
		}

		/// Removes cells until none is below the threshold; returns how many this call removed.
		pub(crate) fn run(&mut self, observer: &mut impl Observer) -> usize {
			use std::collections::VecDeque;

			let before = self.removed;
			let mut worklist = VecDeque::new();

			for pos in self.interior() {
				if self.occupied[pos] && self.counts[pos] < self.threshold {
					self.occupied[pos] = false;
					worklist.push_back(pos);
					observer.queued(self.cell(pos));
				}
			}

			while let Some(pos) = match self.order {
				Order::Lifo => worklist.pop_back(),
				Order::Fifo => worklist.pop_front(),
			} {
				self.removed += 1;
				observer.removed(self.cell(pos), self.removed);

				// Cells that count `pos` as a neighbor sit at the mirrored offsets
				for &delta in &self.deltas {
					let adj_pos = pos.wrapping_add_signed(-delta);
					if !self.occupied[adj_pos] { continue }

					self.counts[adj_pos] -= 1;
					observer.recounted(self.cell(adj_pos), self.counts[adj_pos]);

					if self.counts[adj_pos] == self.threshold - 1 {
						self.occupied[adj_pos] = false;
						worklist.push_back(adj_pos);
						observer.queued(self.cell(adj_pos));
					}
				}
			}

			self.removed - before
		}

		pub(crate) fn removed(&self) -> usize {
			self.removed
		}

		pub(crate) fn remaining(&self) -> Grid {
			Grid {
				cells: self.interior().map(|pos| self.occupied[pos]).collect(),
				cols: self.cols,
			}
		}
	}
}


#[cfg(LOGGING)]
struct Narrator;

#[cfg(LOGGING)]
impl cascade::Observer for Narrator {
	fn queued(&mut self, [row, col]: [usize; 2]) {
		println!("Queued {row},{col}");
	}

	fn recounted(&mut self, [row, col]: [usize; 2], count: u8) {
		println!("  {row},{col} -> {count}");
	}

	fn removed(&mut self, [row, col]: [usize; 2], total: usize) {
		println!("Removed {row},{col} ({total})");
	}
}


fn part1_impl(input_grid: &Grid) -> usize {
	let cascade = Cascade::new(input_grid, &Rules::default());

	#[cfg(LOGGING)]
	for (i, [row, col]) in cascade.accessible().enumerate() {
		println!("{row},{col} = {} | {}", cascade.count_at([row, col]).unwrap_or_default(), i + 1);
	}

	cascade.accessible().count()
}

pub(crate) fn part1(input: &str) -> Result<usize, GridError> {
	Ok(part1_impl(&input.parse()?))
}


fn part2_impl(input_grid: &Grid) -> usize {
	let mut cascade = Cascade::new(input_grid, &Rules::default());

	#[cfg(LOGGING)]
	println!("Grid ({} occupied):\n{input_grid}", input_grid.occupied_count());

	#[cfg(LOGGING)]
	cascade.run(&mut Narrator);
	#[cfg(not(LOGGING))]
	cascade.run(&mut ());

	#[cfg(LOGGING)]
	println!("Remaining:\n{}", cascade.remaining());

	cascade.removed()
}

pub(crate) fn part2(input: &str) -> Result<usize, GridError> {
	Ok(part2_impl(&input.parse()?))
}


mod parsing {
	use std::str::FromStr;
	use super::Grid;

	#[derive(Debug, PartialEq, Eq, thiserror::Error)]
	pub(crate) enum GridError {
		#[error("grid has no cells")]
		Empty,
		#[error("line {line} has {len} cells, expected {expected}")]
		Ragged { line: usize, len: usize, expected: usize },
		#[error("line {line}, column {column}: invalid cell {found:?}")]
		Invalid { line: usize, column: usize, found: char },
	}

	impl Grid {
		pub(crate) fn try_from_rows<R: AsRef<[bool]>>(rows: impl IntoIterator<Item = R>) -> Result<Self, GridError> {
			let mut cells = Vec::new();
			let mut cols = None;
			for (l, row) in rows.into_iter().enumerate() {
				let row = row.as_ref();
				match cols {
					None if row.is_empty() => return Err(GridError::Empty),
					None => cols = Some(row.len()),
					Some(expected) if row.len() != expected =>
						return Err(GridError::Ragged { line: l + 1, len: row.len(), expected }),
					Some(_) => (),
				}
				cells.extend_from_slice(row);
			}
			let cols = cols.ok_or(GridError::Empty)?;
			Ok(Grid { cells, cols })
		}
	}

	/// Symbols are checked on every line before the grid's shape is.
	impl FromStr for Grid {
		type Err = GridError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			let rows = s.trim_end_matches(|c: char| c == '\n' || c == '\r')
				.lines()
				.enumerate()
				.map(|(l, line)| line.chars()
					.enumerate()
					.map(|(c, found)| match found {
						'@' => Ok(true),
						'.' => Ok(false),
						found => Err(GridError::Invalid { line: l + 1, column: c + 1, found }),
					})
					.collect::<Result<Vec<_>, _>>())
				.collect::<Result<Vec<_>, _>>()?;
			Grid::try_from_rows(rows)
		}
	}

	#[test]
	fn tests() {
		assert_eq!("".parse::<Grid>(), Err(GridError::Empty));
		assert_eq!("\n\n".parse::<Grid>(), Err(GridError::Empty));
		assert_eq!("@@\n@\n".parse::<Grid>(), Err(GridError::Ragged { line: 2, len: 1, expected: 2 }));
		assert_eq!("@@\n\n@@".parse::<Grid>(), Err(GridError::Ragged { line: 2, len: 0, expected: 2 }));
		assert_eq!(".@\n@#\n".parse::<Grid>(), Err(GridError::Invalid { line: 2, column: 2, found: '#' }));
		assert_eq!(Grid::try_from_rows(Vec::<Vec<bool>>::new()), Err(GridError::Empty));
		assert_eq!(Grid::try_from_rows([[false; 0]; 3]), Err(GridError::Empty));
		assert_eq!(Grid::try_from_rows([&[true, false][..], &[true][..]]),
			Err(GridError::Ragged { line: 2, len: 1, expected: 2 }));

		let grid = ".@.\n@@@\r\n".parse::<Grid>().unwrap();
		assert_eq!((grid.rows(), grid.cols()), (2, 3));
		assert_eq!(grid, Grid::try_from_rows([[false, true, false], [true, true, true]]).unwrap());
		assert_eq!(grid.to_string(), ".@.\n@@@");
		assert_eq!(grid.occupied_count(), 4);
		assert!(grid.is_occupied([1, 2]));
		assert!(!grid.is_occupied([0, 0]));
		assert!(!grid.is_occupied([2, 1]));
		assert!(!grid.is_occupied([0, 3]));

		assert_eq!(GridError::Ragged { line: 2, len: 1, expected: 2 }.to_string(),
			"line 2 has 1 cells, expected 2");
	}
}
