/// Initialization parameters for a [`Context`](super::Context).
///
/// Keep this structure small. Every flag here changes how each wrapper talks
/// to the driver, so add one only when a concrete need exists.
#[derive(Debug, Clone)]
pub struct ContextInit {
    /// Query the driver error state after every state-changing call.
    ///
    /// Disabling this removes one round trip per call; driver failures then go
    /// unreported.
    pub check_errors: bool,

    /// Emit a `trace` record naming every checked driver call.
    pub trace_calls: bool,

    /// Number of texture units samplers may use.
    ///
    /// `None` queries `GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS`.
    pub texture_units: Option<u32>,
}

impl Default for ContextInit {
    fn default() -> Self {
        Self {
            check_errors: true,
            trace_calls: false,
            texture_units: None,
        }
    }
}
