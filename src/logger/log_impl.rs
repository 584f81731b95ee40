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

use std::io::Write;

use log::LevelFilter;

use crate::Error;
use crate::append::Append;
use crate::filter::Filter;
use crate::filter::FilterResult;

/// A logger that dispatches log records to one or more dispatches.
///
/// This struct implements [`log::Log`] to bridge the assembled sinks with the
/// [`log`] crate. A `Logger` is an inert value until it is installed with
/// [`Logger::try_apply`] or handed records directly.
#[derive(Debug)]
pub struct Logger {
    dispatches: Vec<Dispatch>,
    max_level: LevelFilter,
}

impl Logger {
    pub(crate) fn new(dispatches: Vec<Dispatch>, max_level: LevelFilter) -> Self {
        Self {
            dispatches,
            max_level,
        }
    }

    /// The level passed to [`log::set_max_level`] on installation.
    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    /// Installs this logger as the global logger.
    ///
    /// This should be called early in the execution of a Rust program. Any
    /// log events that occur before installation are ignored.
    ///
    /// # Errors
    ///
    /// Fails if a global logger has already been installed.
    pub fn try_apply(self) -> Result<(), Error> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Installs this logger as the global logger.
    ///
    /// # Panics
    ///
    /// Panics if a global logger has already been installed.
    pub fn apply(self) {
        self.try_apply()
            .expect("Logger::apply should not be called after the global logger initialized");
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.dispatches
            .iter()
            .any(|dispatch| dispatch.enabled(metadata))
    }

    fn log(&self, record: &log::Record) {
        for dispatch in &self.dispatches {
            if let Err(err) = dispatch.log(record) {
                handle_log_error(record, &err);
            }
        }
    }

    fn flush(&self) {
        for dispatch in &self.dispatches {
            dispatch.flush();
        }
    }
}

/// A grouped set of filters and appenders.
///
/// The [`Logger`] facade hands each record to every `Dispatch`; a dispatch
/// forwards it to its appenders unless one of its filters rejects it.
#[derive(Debug)]
pub(crate) struct Dispatch {
    filters: Vec<Filter>,
    appends: Vec<Box<dyn Append>>,
}

impl Dispatch {
    pub(crate) fn new(filters: Vec<Filter>, appends: Vec<Box<dyn Append>>) -> Self {
        debug_assert!(
            !appends.is_empty(),
            "A Dispatch must have at least one appender"
        );

        Self { filters, appends }
    }

    fn enabled(&self, metadata: &log::Metadata) -> bool {
        for filter in &self.filters {
            match filter.enabled(metadata) {
                FilterResult::Reject => return false,
                FilterResult::Accept => return true,
                FilterResult::Neutral => {}
            }
        }

        true
    }

    fn log(&self, record: &log::Record) -> anyhow::Result<()> {
        for filter in &self.filters {
            match filter.matches(record) {
                FilterResult::Reject => return Ok(()),
                FilterResult::Accept => break,
                FilterResult::Neutral => {}
            }
        }

        for append in &self.appends {
            append.append(record)?;
        }
        Ok(())
    }

    fn flush(&self) {
        for append in &self.appends {
            append.flush();
        }
    }
}

fn handle_log_error(record: &log::Record, error: &anyhow::Error) {
    let _ = writeln!(
        std::io::stderr(),
        "error performing logging.\n    attempted to log: {args}\n    error: {error}",
        args = record.args(),
    );
}
