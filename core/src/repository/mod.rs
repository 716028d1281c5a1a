pub mod file;
pub mod memory;
pub mod remote;
pub mod traits;

// Re-export
pub use file::FileTaskRepository;
pub use memory::MemoryTaskRepository;
pub use remote::RemoteTaskRepository;
pub use traits::TaskRepository;
