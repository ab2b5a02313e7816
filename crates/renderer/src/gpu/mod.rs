mod context;
mod pipeline;
mod state;

pub(crate) use state::GpuState;
