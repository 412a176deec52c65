pub mod presence_sweep;
