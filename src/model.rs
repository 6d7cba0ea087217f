use std::fmt;

use crate::error::{ConfigurationError, IllegalMoveError, MoveRejection};

pub type ColorId = usize;

/// A pour from one tube into another, by tube index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: usize,
    pub destination: usize,
}
impl Move {
    pub fn new(source: usize, destination: usize) -> Self {
        Self { source, destination }
    }

    pub fn as_pair(&self) -> (usize, usize) {
        (self.source, self.destination)
    }
}
impl From<(usize, usize)> for Move {
    fn from((source, destination): (usize, usize)) -> Self {
        Self::new(source, destination)
    }
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.destination)
    }
}

/// Which boards count as won.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GoalRule {
    /// Every non-empty tube holds one color, at any fill level.
    #[default]
    Uniform,
    /// Every non-empty tube is full and holds one color.
    Complete,
}

/// The shape of a freshly generated game: `colors` colors of `capacity` units
/// each, dealt into `colors` tubes, plus `empty_tubes` empty ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PuzzleParameters {
    pub colors: usize,
    pub empty_tubes: usize,
    pub capacity: usize,
}
impl PuzzleParameters {
    pub fn new(colors: usize, empty_tubes: usize, capacity: usize) -> Self {
        Self {
            colors,
            empty_tubes,
            capacity,
        }
    }

    pub fn tube_count(&self) -> usize {
        self.colors + self.empty_tubes
    }
}

/// Colored units stacked bottom to top. The last element is the top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tube {
    units: Vec<ColorId>,
}
impl Tube {
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    pub fn from_units(units: Vec<ColorId>) -> Self {
        Self { units }
    }

    pub fn get_units(&self) -> &[ColorId] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get_top_color(&self) -> Option<ColorId> {
        self.units.last().copied()
    }

    /// Length of the same-colored run at the top.
    pub fn get_top_run_depth(&self) -> usize {
        let Some(top) = self.get_top_color() else {
            return 0;
        };
        self.units
            .iter()
            .rev()
            .take_while(|&&color| color == top)
            .count()
    }

    pub fn distinct_colors(&self) -> usize {
        let mut seen: Vec<ColorId> = Vec::with_capacity(self.units.len());
        for &color in &self.units {
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
        seen.len()
    }

    pub fn is_uniform(&self) -> bool {
        self.distinct_colors() <= 1
    }

    /// Units that would move when pouring `self` into `other`; zero if the pour is not allowed.
    pub fn get_pourable_amount(&self, other: &Tube, capacity: usize) -> usize {
        let Some(top) = self.get_top_color() else {
            return 0;
        };
        if !other.is_empty() && other.get_top_color() != Some(top) {
            return 0;
        }
        let space = capacity.saturating_sub(other.len());
        self.get_top_run_depth().min(space)
    }

    pub fn could_pour_into(&self, other: &Tube, capacity: usize) -> bool {
        self.get_pourable_amount(other, capacity) > 0
    }
}

/// A whole board: tubes in a fixed order sharing one capacity.
///
/// Values are immutable once built; moves produce new configurations.
/// Equality and hashing compare tube contents position by position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Configuration {
    tubes: Box<[Tube]>,
    capacity: usize,
}

impl Configuration {
    /// Builds a board from bottom-to-top tube contents.
    ///
    /// # Errors
    /// Returns `ConfigurationError` for a zero capacity, an empty tube list, or a
    /// tube holding more than `capacity` units.
    pub fn new(tubes: Vec<Vec<ColorId>>, capacity: usize) -> Result<Self, ConfigurationError> {
        if capacity == 0 {
            return Err(ConfigurationError::ZeroCapacity);
        }
        if tubes.is_empty() {
            return Err(ConfigurationError::NoTubes);
        }
        if let Some((tube, units)) = tubes.iter().enumerate().find(|(_, u)| u.len() > capacity) {
            return Err(ConfigurationError::Overfull {
                tube,
                len: units.len(),
                capacity,
            });
        }
        Ok(Self {
            tubes: tubes.into_iter().map(Tube::from_units).collect(),
            capacity,
        })
    }

    /// Builds a board and checks it against the shape of a generated game.
    ///
    /// # Errors
    /// On top of the checks in [`Configuration::new`], fails when the tube count,
    /// the set of colors, or any color's unit count differ from `params`.
    pub fn with_parameters(
        tubes: Vec<Vec<ColorId>>,
        params: PuzzleParameters,
    ) -> Result<Self, ConfigurationError> {
        if tubes.len() != params.tube_count() {
            return Err(ConfigurationError::TubeCount {
                expected: params.tube_count(),
                found: tubes.len(),
            });
        }
        let config = Self::new(tubes, params.capacity)?;
        let mut counts = vec![0usize; params.colors];
        for &color in config.tubes.iter().flat_map(|t| t.get_units()) {
            match counts.get_mut(color) {
                Some(count) => *count += 1,
                None => {
                    return Err(ConfigurationError::UnknownColor {
                        color,
                        colors: params.colors,
                    });
                }
            }
        }
        if let Some((color, &found)) = counts
            .iter()
            .enumerate()
            .find(|(_, count)| **count != params.capacity)
        {
            return Err(ConfigurationError::ColorCount {
                color,
                expected: params.capacity,
                found,
            });
        }
        Ok(config)
    }

    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    pub fn get_tubes(&self) -> &[Tube] {
        &self.tubes
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Every color present with its unit count, ordered by color.
    pub fn get_available_colors_with_count(&self) -> Vec<(ColorId, usize)> {
        let mut counts: Vec<(ColorId, usize)> = Vec::new();
        for &color in self.tubes.iter().flat_map(|t| t.get_units()) {
            match counts.iter_mut().find(|(c, _)| *c == color) {
                Some((_, count)) => *count += 1,
                None => counts.push((color, 1)),
            }
        }
        counts.sort_unstable();
        counts
    }

    /// Number of units `mv` would transfer, or the reason it is illegal.
    pub fn check_move(&self, mv: Move) -> Result<usize, IllegalMoveError> {
        let reject = |reason| IllegalMoveError { mv, reason };
        let tube_count = self.tubes.len();
        if mv.source >= tube_count || mv.destination >= tube_count {
            return Err(reject(MoveRejection::OutOfRange { tube_count }));
        }
        if mv.source == mv.destination {
            return Err(reject(MoveRejection::SameTube));
        }
        let source = &self.tubes[mv.source];
        let destination = &self.tubes[mv.destination];
        if source.is_empty() {
            return Err(reject(MoveRejection::EmptySource));
        }
        if destination.len() >= self.capacity {
            return Err(reject(MoveRejection::FullDestination));
        }
        match source.get_pourable_amount(destination, self.capacity) {
            0 => Err(reject(MoveRejection::ColorMismatch)),
            amount => Ok(amount),
        }
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// All legal moves, by ascending source then ascending destination.
    pub fn legal_moves(&self) -> Vec<Move> {
        let n = self.tubes.len();
        let mut moves = Vec::new();
        for source in 0..n {
            for destination in 0..n {
                if source == destination {
                    continue;
                }
                if self.tubes[source].could_pour_into(&self.tubes[destination], self.capacity) {
                    moves.push(Move::new(source, destination));
                }
            }
        }
        moves
    }

    /// Legal moves paired with the board each one produces.
    pub fn successors(&self) -> impl Iterator<Item = (Move, Configuration)> + '_ {
        self.legal_moves().into_iter().map(move |mv| {
            let destination = &self.tubes[mv.destination];
            let amount = self.tubes[mv.source].get_pourable_amount(destination, self.capacity);
            (mv, self.pour(mv, amount))
        })
    }

    /// Returns the board after `mv`. `self` is left untouched.
    ///
    /// # Errors
    /// Returns `IllegalMoveError` when `mv` is not one of [`Configuration::legal_moves`].
    pub fn apply_move(&self, mv: Move) -> Result<Configuration, IllegalMoveError> {
        let amount = self.check_move(mv)?;
        Ok(self.pour(mv, amount))
    }

    /// Applies `moves` in order.
    ///
    /// # Errors
    /// Stops at the first illegal move.
    pub fn replay(&self, moves: &[Move]) -> Result<Configuration, IllegalMoveError> {
        let mut state = self.clone();
        for &mv in moves {
            state = state.apply_move(mv)?;
        }
        Ok(state)
    }

    fn pour(&self, mv: Move, amount: usize) -> Configuration {
        let mut tubes = self.tubes.clone();
        let keep = tubes[mv.source].units.len() - amount;
        let moved: Vec<ColorId> = tubes[mv.source].units.drain(keep..).collect();
        tubes[mv.destination].units.extend(moved);
        Configuration {
            tubes,
            capacity: self.capacity,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.tubes.iter().all(Tube::is_uniform)
    }

    pub fn satisfies(&self, goal: GoalRule) -> bool {
        match goal {
            GoalRule::Uniform => self.is_solved(),
            GoalRule::Complete => self
                .tubes
                .iter()
                .all(|t| t.is_empty() || (t.len() == self.capacity && t.is_uniform())),
        }
    }

    /// Sum over non-empty tubes of distinct colors minus one.
    pub fn fragmentation(&self) -> usize {
        self.tubes
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.distinct_colors() - 1)
            .sum()
    }
}
