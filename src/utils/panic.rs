use color_backtrace::{BacktracePrinter, Verbosity};

pub fn setup() {
    // Full frames while debugging, the short form otherwise.
    let verbosity = if cfg!(debug_assertions) {
        Verbosity::Full
    } else {
        Verbosity::Minimal
    };

    BacktracePrinter::new()
        .lib_verbosity(verbosity)
        .verbosity(verbosity)
        .install(color_backtrace::default_output_stream());
}
