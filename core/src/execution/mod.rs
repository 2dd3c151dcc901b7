//! Execution surfaces around the engine: tracing, tour assembly and batches
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod batch;
pub mod tour;
pub mod tracer;

pub use self::batch::solve_all;
pub use self::tour::{Tour, TourBuilder, TourError};
pub use self::tracer::{
    AxisStat, LogCrateSink, LogSink, MatrixSnapshot, NullSink, SnapshotPhase, SnapshotRecorder,
};
