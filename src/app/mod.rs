//! Application orchestration module

pub mod execution;
pub mod initialization;

pub use execution::{run_demo, run_script, run_step};
pub use initialization::{
    build_host_config,
    configure_logging,
    create_colour_manager,
    load_configuration,
    load_steps,
};
