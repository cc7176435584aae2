//! Utilities shared by Nova tests.
//!
//! Most reflection tests need a handful of small class hierarchies. Rather than spelling out
//! JVM descriptors and access flags by hand, tests declare members in Java-like syntax:
//!
//! ```
//! use nova_test_utils::ClassBuilder;
//!
//! let stub = ClassBuilder::class("com.example.Task")
//!     .implements("java.lang.Runnable")
//!     .field("private static final int LIMIT")
//!     .constructor("public", &["java.lang.String"])
//!     .method("public void run()")
//!     .build();
//! assert_eq!(stub.methods.len(), 2);
//! ```

mod stubs;

pub use stubs::*;

use std::sync::Once;

/// Route `tracing` output through the test harness's captured stdout.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
