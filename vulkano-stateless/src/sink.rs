// Copyright (c) 2016 The vulkano developers
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or https://opensource.org/licenses/MIT>,
// at your option. All files in the project carrying such
// notice may not be copied, modified, or distributed except
// according to those terms.

//! Where reported violations go.

use crate::ValidationError;
use std::fmt::Debug;
use tracing::error;

/// Receives every violation that a `pre_call_validate_*` function finds.
///
/// The dispatch layer can provide its own sink to forward violations to a debug messenger, or to
/// collect them.
pub trait ViolationSink: Debug + Send + Sync {
    /// Reports one violation found while validating the entry point `api`, such as
    /// `"vkCreateBuffer"`.
    fn report(&self, api: &'static str, error: &ValidationError);
}

/// The default sink, which emits every violation as a `tracing` error event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ViolationSink for TracingSink {
    fn report(&self, api: &'static str, error: &ValidationError) {
        error!(vuid = error.vuid(), api, kind = ?error.kind, "{}", error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViolationKind;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn tracing_sink_emits_without_panicking() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("error"))
            .with_test_writer()
            .finish();

        let error = ValidationError {
            context: "create_info.size".into(),
            problem: "is 0".into(),
            vuids: &["VUID-VkBufferCreateInfo-size-00912"],
            kind: ViolationKind::IllegalValue,
            ..Default::default()
        };

        tracing::subscriber::with_default(subscriber, || {
            TracingSink.report("vkCreateBuffer", &error);
        });
    }
}
