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

use std::str::FromStr;

use crate::Error;
use crate::ErrorKind;

bitflags::bitflags! {
    /// Header fields a [`Logger`](crate::Logger) writes in front of every record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// The local date: `2009/01/23`.
        const DATE = 1 << 0;
        /// The local time: `01:23:23`.
        const TIME = 1 << 1;
        /// Microsecond resolution: `01:23:23.123123`. Implies `TIME`.
        const MICROSECONDS = 1 << 2;
        /// The full file name and line number: `/a/b/c/d.rs:23`.
        const LONGFILE = 1 << 3;
        /// The final file name element and line number: `d.rs:23`. Overrides `LONGFILE`.
        const SHORTFILE = 1 << 4;
        /// Use UTC rather than the local time zone.
        const UTC = 1 << 5;
        /// The initial values: `DATE | TIME`.
        const STDFLAGS = Self::DATE.bits() | Self::TIME.bits();
    }
}

impl Default for Flags {
    fn default() -> Self {
        Flags::STDFLAGS
    }
}

impl FromStr for Flags {
    type Err = Error;

    /// Parse a set of flag names such as `date|time|shortfile`.
    ///
    /// Names may be separated by `|`, `,` or whitespace, are case-insensitive, and may carry a
    /// `log.` or `L` prefix (`log.Lshortfile`). An empty string yields no flags.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = s
            .split(|c: char| c == '|' || c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());

        let mut flags = Flags::empty();
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            let name = lower.strip_prefix("log.").unwrap_or(&lower);
            let flag = lookup(name)
                .or_else(|| name.strip_prefix('l').and_then(lookup))
                .ok_or_else(|| {
                    Error::new(ErrorKind::InvalidAttribute, "unknown logger flag")
                        .with_context("attribute", "flag")
                        .with_context("value", token)
                })?;
            flags |= flag;
        }
        Ok(flags)
    }
}

fn lookup(name: &str) -> Option<Flags> {
    match name {
        "date" => Some(Flags::DATE),
        "time" => Some(Flags::TIME),
        "microseconds" => Some(Flags::MICROSECONDS),
        "longfile" => Some(Flags::LONGFILE),
        "shortfile" => Some(Flags::SHORTFILE),
        "utc" => Some(Flags::UTC),
        "stdflags" => Some(Flags::STDFLAGS),
        _ => None,
    }
}
