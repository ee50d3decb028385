pub mod directory;
pub mod error;
pub mod policy;
pub mod traits;
pub mod types;

pub use directory::{ContainerDirectory, InMemoryDirectory};
pub use error::LoadError;
pub use policy::{EnvironmentMode, OriginPolicy};
pub use traits::RemoteContainer;
pub use types::{
    CacheKey, ComponentHandle, EntryModule, ModuleFactory, RemoteDescriptor, RemoteModule,
    SharedDependency, SharedScope,
};
