// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# synergy-infotheory

Histogram-based information measures over continuous or count data and the
Williams–Beer partial information decomposition (PID).

## Pipeline

```text
samples (n × dims) ──► Binning (equal interval, shifted copies)
                   ──► Estimator (one symbol table per shift)
                   ──► entropy / mutual_info / i_min   (averaged over shifts)
                   ──► decompose2 / decompose3          (PID atoms)
```

Column 0 is conventionally the target; every measure takes explicit
dimension indices so any column can play any role.

All quantities are in bits.
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod binning;
pub mod error;
pub mod estimator;
pub mod pid;

pub use binning::Binning;
pub use error::{InfoError, InfoResult};
pub use estimator::Estimator;
pub use pid::{decompose2, decompose3, round_to, Pid2, Pid3};
