use rand::seq::SliceRandom;
use rand::Rng;

/// Hours a session may start at. 12 is left free for lunch.
pub const AVAILABLE_HOURS: [u32; 12] = [8, 9, 10, 11, 13, 14, 15, 16, 17, 18, 19, 20];
/// Preferred start hours for hard material
pub const MORNING_FIRST: [u32; 8] = [9, 10, 11, 14, 15, 8, 16, 17];
/// Preferred start hours for lighter material
pub const AFTERNOON_FIRST: [u32; 8] = [14, 15, 16, 17, 18, 19, 10, 11];
/// Subjects at or above this difficulty prefer mornings
pub const MORNING_DIFFICULTY: f64 = 6.0;
pub const MAX_SESSIONS_PER_DAY: usize = 2;
/// Mon, Wed, Fri, then Sun, Tue, Thu, Sat
pub const DAY_ORDER: [u8; 7] = [1, 3, 5, 0, 2, 4, 6];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placed {
    day: u8,
    start: u32,
    duration: u32,
}

impl Placed {
    fn overlaps(&self, day: u8, start: u32, duration: u32) -> bool {
        self.day == day && start < self.start + self.duration && self.start < start + duration
    }
}

/// Sessions placed so far in the week being built.
#[derive(Debug, Default)]
pub struct WeekGrid {
    placed: Vec<Placed>,
}

impl WeekGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions_on(&self, day: u8) -> usize {
        self.placed.iter().filter(|p| p.day == day).count()
    }

    pub fn has_room(&self, day: u8) -> bool {
        self.sessions_on(day) < MAX_SESSIONS_PER_DAY
    }

    pub fn is_free(&self, day: u8, hour: u32, duration: u32) -> bool {
        let start = hour * 60;
        !self.placed.iter().any(|p| p.overlaps(day, start, duration))
    }

    pub fn place(&mut self, day: u8, hour: u32, duration: u32) {
        self.placed.push(Placed { day, start: hour * 60, duration });
    }

    /// First free start hour on `day`, trying the difficulty's preferred hours
    /// before every available hour in random order.
    pub fn find_available_slot<R: Rng + ?Sized>(
        &self,
        day: u8,
        duration: u32,
        difficulty: f64,
        rng: &mut R,
    ) -> Option<u32> {
        let preferred: &[u32] = if difficulty >= MORNING_DIFFICULTY {
            &MORNING_FIRST
        } else {
            &AFTERNOON_FIRST
        };

        let hit = preferred
            .iter()
            .copied()
            .filter(|hour| AVAILABLE_HOURS.contains(hour))
            .find(|&hour| self.is_free(day, hour, duration));
        if hit.is_some() {
            return hit;
        }

        let mut fallback = AVAILABLE_HOURS.to_vec();
        fallback.shuffle(rng);
        fallback.into_iter().find(|&hour| self.is_free(day, hour, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hard_subjects_prefer_mornings() {
        let grid = WeekGrid::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(grid.find_available_slot(1, 90, 8.0, &mut rng), Some(9));
        assert_eq!(grid.find_available_slot(1, 45, 2.0, &mut rng), Some(14));
    }

    #[test]
    fn test_skips_overlapping_hours() {
        let mut grid = WeekGrid::new();
        grid.place(1, 9, 90);
        let mut rng = StdRng::seed_from_u64(7);
        // 10:00 overlaps 09:00-10:30, 11:00 does not
        assert_eq!(grid.find_available_slot(1, 60, 8.0, &mut rng), Some(11));
        // other days are unaffected
        assert_eq!(grid.find_available_slot(2, 60, 8.0, &mut rng), Some(9));
    }

    #[test]
    fn test_fallback_uses_remaining_hours() {
        let mut grid = WeekGrid::new();
        for hour in MORNING_FIRST {
            grid.place(3, hour, 60);
        }
        let mut rng = StdRng::seed_from_u64(42);
        let hour = grid.find_available_slot(3, 60, 9.0, &mut rng).unwrap();
        assert!([13, 18, 19, 20].contains(&hour));
    }

    #[test]
    fn test_fallback_is_reproducible_with_seed() {
        let mut grid = WeekGrid::new();
        for hour in AFTERNOON_FIRST {
            grid.place(0, hour, 60);
        }
        let first = grid.find_available_slot(0, 60, 1.0, &mut StdRng::seed_from_u64(3));
        let second = grid.find_available_slot(0, 60, 1.0, &mut StdRng::seed_from_u64(3));
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_full_day_has_no_slot() {
        let mut grid = WeekGrid::new();
        grid.place(4, 8, 13 * 60);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(grid.find_available_slot(4, 45, 5.0, &mut rng), None);
    }
}
