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

use logtree::ErrorKind;
use logtree::Level;
use logtree::Router;
use logtree::writer::Constructed;
use logtree::writer::Memory;

fn router_with_sink(sink: &Memory) -> Router {
    let router = Router::default();
    let shared = sink.clone();
    assert!(
        router
            .registry()
            .register("memory", move |_| Ok(Constructed::leaf(shared.clone())))
    );
    router
}

#[test]
fn test_buffer_releases_pairs() {
    let sink = Memory::default();
    let router = router_with_sink(&sink);
    router
        .init_from_xml(
            r#"
            <logs>
                <debug flag="">
                    <buffer size="2">
                        <console output="stdout" />
                        <memory />
                    </buffer>
                </debug>
            </logs>
            "#,
        )
        .unwrap();

    router.debug(format_args!("first"));
    assert!(sink.writes().is_empty());

    router.debug(format_args!("second"));
    assert_eq!(sink.writes(), vec![b"first\nsecond\n".to_vec()]);
}

#[test]
fn test_buffer_of_ten_with_manual_flush() {
    let sink = Memory::default();
    let router = router_with_sink(&sink);
    router
        .init_from_xml(
            r#"<logs><debug flag=""><buffer size="10"><memory /></buffer></debug></logs>"#,
        )
        .unwrap();

    for i in 0..9 {
        router.debug(format_args!("record {i}"));
    }
    assert!(sink.writes().is_empty());

    router.debug(format_args!("record 9"));
    let writes = sink.writes();
    assert_eq!(writes.len(), 1);
    let expected = (0..10).map(|i| format!("record {i}\n")).collect::<String>();
    assert_eq!(writes[0], expected.into_bytes());

    router.flush().unwrap();
    assert_eq!(sink.writes().len(), 1);
    assert_eq!(sink.flushes(), 1);
}

#[test]
fn test_misspelled_root_keeps_prior_routing() {
    let sink = Memory::default();
    let router = router_with_sink(&sink);
    router
        .init_from_xml(r#"<logs><info flag=""><memory /></info></logs>"#)
        .unwrap();

    let err = router
        .init_from_xml(r#"<log><info flag=""><console /></info></log>"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);

    router.info(format_args!("still here"));
    assert_eq!(sink.contents(), b"still here\n");
}

#[test]
fn test_unregistered_writer_is_named() {
    let router = Router::default();
    let err = router
        .init_from_xml(r#"<logs><warn><buffer size="1"><teletype /></buffer></warn></logs>"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownWriter);
    assert_eq!(err.context("writer"), Some("teletype"));
    assert!(err.to_string().contains("teletype"), "{err}");
}

#[test]
fn test_duplicate_siblings_are_rejected() {
    let router = Router::default();
    let err = router
        .init_from_xml(r#"<logs><info><console /><console /></info></logs>"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
}

#[test]
fn test_reconfiguration_flushes_old_tree() {
    let old_sink = Memory::default();
    let router = router_with_sink(&old_sink);
    router
        .init_from_xml(
            r#"<logs><error flag=""><buffer size="100"><memory /></buffer></error></logs>"#,
        )
        .unwrap();
    router.error(format_args!("one"));
    router.error(format_args!("two"));
    assert!(old_sink.writes().is_empty());

    router
        .init_from_xml(r#"<logs><info><console output="stderr" /></info></logs>"#)
        .unwrap();
    assert_eq!(old_sink.writes(), vec![b"one\ntwo\n".to_vec()]);

    router.error(format_args!("unbound now"));
    assert_eq!(old_sink.writes().len(), 1);
    assert_eq!(router.logger(Level::Error).prefix(), "");
}

#[test]
fn test_concurrent_logging_through_buffer() {
    let sink = Memory::default();
    let router = router_with_sink(&sink);
    router
        .init_from_xml(r#"<logs><info flag=""><buffer size="4"><memory /></buffer></info></logs>"#)
        .unwrap();

    std::thread::scope(|scope| {
        for t in 0..4 {
            let router = &router;
            scope.spawn(move || {
                for i in 0..25 {
                    router.info(format_args!("{t}-{i}"));
                }
            });
        }
    });
    router.flush().unwrap();

    let writes = sink.writes();
    assert_eq!(writes.len(), 25);
    let text = String::from_utf8(sink.contents()).unwrap();
    assert_eq!(text.lines().count(), 100);
    for t in 0..4 {
        for i in 0..25 {
            assert!(text.lines().any(|line| line == format!("{t}-{i}")));
        }
    }
}
