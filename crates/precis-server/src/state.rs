use precis_core::ExtractPipeline;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub pipeline: Box<dyn ExtractPipeline>,
}

impl AppState {
    pub fn new(pipeline: impl ExtractPipeline + 'static) -> Self {
        Self {
            pipeline: Box::new(pipeline),
        }
    }
}
