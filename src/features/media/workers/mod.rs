mod cleanup_worker;

pub use cleanup_worker::MediaCleanupWorker;
