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

use std::sync::Arc;

use logtree::Router;

fn main() {
    let router = Arc::new(Router::default());
    let config = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/logs.xml");
    if let Err(err) = router.init_from_xml_file(config) {
        eprintln!("failed to load {config}: {err}");
        return;
    }
    router.clone().apply().unwrap();

    router.trace(format_args!("Hello trace!"));
    router.debug(format_args!("Hello debug! (no section, discarded)"));
    for i in 0..12 {
        router.info(format_args!("Hello info #{i}!"));
    }
    router.warn(format_args!("Hello warn!"));
    router.error(format_args!("Hello error!"));

    log::info!("Hello info from the log crate!");
    log::error!("Hello error from the log crate!");

    router.flush().unwrap();
}
