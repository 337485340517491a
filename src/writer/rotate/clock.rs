// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use jiff::Timestamp;

/// Where a rotating writer reads the time its file names are stamped with.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    /// A pinned instant that only moves when set.
    #[cfg(test)]
    Fixed(Timestamp),
}

impl Clock {
    pub fn now(&self) -> Timestamp {
        match self {
            Clock::System => Timestamp::now(),
            #[cfg(test)]
            Clock::Fixed(now) => *now,
        }
    }

    /// Move a pinned clock to `now`. A system clock cannot be moved and ignores the call.
    #[cfg(test)]
    pub fn set_now(&mut self, now: Timestamp) {
        if let Clock::Fixed(pinned) = self {
            *pinned = now;
        }
    }

    /// The file name stamp for the current instant: `YYYYMMDD-HHMMSS.ffffff`, in UTC.
    pub fn stamp(&self) -> String {
        let now = self.now();
        format!(
            "{}.{:06}",
            now.strftime("%Y%m%d-%H%M%S"),
            now.subsec_microsecond()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_moves_only_when_set() {
        let start = "2024-08-10T17:12:52.5Z".parse::<Timestamp>().unwrap();
        let mut clock = Clock::Fixed(start);
        assert_eq!(clock.now(), start);
        assert_eq!(clock.stamp(), "20240810-171252.500000");

        let later = "2024-08-10T17:12:53Z".parse::<Timestamp>().unwrap();
        clock.set_now(later);
        assert_eq!(clock.now(), later);
        assert_eq!(clock.stamp(), "20240810-171253.000000");
    }

    #[test]
    fn test_system_clock_ignores_set() {
        let mut clock = Clock::default();
        let pinned = "2000-01-01T00:00:00Z".parse::<Timestamp>().unwrap();
        clock.set_now(pinned);
        assert!(clock.now() > pinned);
    }
}
