//! Body vectors: each file is delivered chunk by chunk through a fresh
//! handler, then compared against its expected winner or error code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use labelstat_core::body::{Action, Outcome, ResponseBodyHandler};
use labelstat_core::registry::MetricRegistry;

mod support;
mod vector_loader;
use support::MemoryHost;

#[test]
fn body_vectors() {
    for f in vector_loader::ALL {
        let v = vector_loader::load(f);
        let reg = MetricRegistry::new(MemoryHost::default());
        let mut handler = ResponseBodyHandler::new(&reg, None);

        let mut buf = Vec::new();
        for chunk in &v.chunks {
            buf.extend_from_slice(chunk.as_bytes());
            assert_eq!(
                handler.on_response_body(&buf[..], buf.len(), false),
                Action::Pause,
                "vector={}",
                v.description
            );
        }
        assert_eq!(buf, v.body(), "vector={}", v.description);
        assert_eq!(
            handler.on_response_body(&buf[..], buf.len(), true),
            Action::Continue,
            "vector={}",
            v.description
        );

        if let Some(err) = &v.expect_error {
            match handler.outcome() {
                Outcome::Skipped(kind) => {
                    assert_eq!(kind.as_str(), err.code, "vector={}", v.description)
                }
                other => panic!("vector={}: expected skip, got {other:?}", v.description),
            }
            assert_eq!(reg.host().total(), 0, "vector={}", v.description);
            continue;
        }

        let ex = v.expect.as_ref().expect("missing expect block");
        assert_eq!(
            handler.outcome(),
            &Outcome::Recorded { label: ex.label.clone(), score: ex.score },
            "vector={}",
            v.description
        );
        assert_eq!(reg.host().value(&ex.label), Some(1), "vector={}", v.description);
        assert_eq!(reg.host().total(), 1, "vector={}", v.description);
    }
}
