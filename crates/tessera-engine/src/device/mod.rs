//! GPU device + surface management.
//!
//! [`Context`] connects to an adapter, configures the window surface and
//! tracks its extent. Surface errors are classified into a
//! [`SurfaceErrorAction`] for the runtime to act on.

mod context;
mod extent;
mod frame;
mod init;
mod scope;
mod surface;

pub use context::Context;
pub use extent::SurfaceExtent;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;

pub(crate) use scope::validated;
