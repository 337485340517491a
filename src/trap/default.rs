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

use std::io;
use std::io::Write;

use crate::Error;
use crate::trap::Trap;

/// The trap used unless another one is configured.
///
/// Each error becomes one `logtree: <kind>: <message>...` line on standard error, written while
/// holding the stderr lock so lines from concurrent writers do not interleave. Failing to
/// write that line is ignored.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

impl DefaultTrap {
    fn report(out: &mut impl Write, err: &Error) -> io::Result<()> {
        writeln!(out, "logtree: {err}")?;
        out.flush()
    }
}

impl Trap for DefaultTrap {
    fn trap(&self, err: &Error) {
        let _ = Self::report(&mut io::stderr().lock(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_report_is_one_line() {
        let err = Error::new(ErrorKind::Io, "failed to flush log file on drop")
            .with_context("path", "/var/log/app.log");
        let mut out = Vec::new();
        DefaultTrap::report(&mut out, &err).unwrap();
        insta::assert_snapshot!(
            String::from_utf8(out).unwrap().trim_end(),
            @"logtree: Io: failed to flush log file on drop, context: { path: /var/log/app.log }"
        );
    }
}
