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

//! Severity routing: the [`Router`] binds each section of a configuration to a [`Logger`].

mod flags;
mod level;
#[allow(clippy::module_inception)]
mod logger;
mod router;

pub use self::flags::Flags;
pub use self::level::Level;
pub use self::logger::Logger;
pub use self::router::Router;
