// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Appender for writing log records to a size-rotated file.
//!
//! # Example
//!
//! ```
//! use logwright::append::RotatingFile;
//! use logwright::append::RotatingFileWriter;
//! use logwright::layout::JsonLayout;
//!
//! let writer = RotatingFileWriter::builder()
//!     .max_size_mb(128)
//!     .max_backups(7)
//!     .compress(true)
//!     .build("logs/app.json")
//!     .unwrap();
//!
//! logwright::builder()
//!     .filter(log::LevelFilter::Info)
//!     .append(RotatingFile::new(writer, JsonLayout::default()))
//!     .apply();
//!
//! log::info!("This log will be written to a rotating file.");
//! ```

pub use append::RotatingFile;
pub use writer::RotatingFileWriter;
pub use writer::RotatingFileWriterBuilder;

mod append;
mod writer;
