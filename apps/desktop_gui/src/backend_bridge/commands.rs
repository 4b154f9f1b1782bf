//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    Classify {
        description: String,
        supplier: String,
    },
}
