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

use log::LevelFilter;

use super::log_impl::Dispatch;
use super::log_impl::Logger;
use crate::Error;
use crate::append::Append;
use crate::filter::Filter;

/// Create a new empty [builder][Builder].
///
/// The builder must be configured before assembling a logger. At least one
/// appender should be added:
///
/// ```rust
/// use logwright::append;
///
/// logwright::builder()
///     // .build()  CANNOT COMPILE: a staging dispatch without an appender
///     .filter(log::LevelFilter::Info)
///     .append(append::Stdout::default())
///     .apply();
/// ```
///
/// Multiple dispatches can be added:
///
/// ```rust
/// use logwright::append;
///
/// logwright::builder()
///     .filter(log::LevelFilter::Info)
///     .append(append::Stdout::default())
///     .dispatch() // finish the current dispatch and start a new staging dispatch
///     .filter(log::LevelFilter::Error)
///     .append(append::Stderr::default())
///     .apply();
/// ```
pub fn builder() -> Builder<false> {
    Builder::default()
}

/// A builder for assembling a [`Logger`] by hand. See also [`builder`] for a
/// fluent entry point and [`Config`](crate::Config) for the declarative one.
///
/// * `READY=false`: the initialized state. [`Filter`]s and [`Append`]s can be
///   configured for the current staging dispatch. Once at least one appender
///   is configured, the builder transits to `READY=true`.
/// * `READY=true`: the builder can be [built][Builder::build] into a `Logger`
///   or [applied][Builder::apply] as the global logger, or a new staging
///   dispatch can be started with [dispatch][Builder::dispatch].
#[must_use = "call `build` to assemble the logger or `apply` to install it globally"]
#[derive(Debug)]
pub struct Builder<const READY: bool = true> {
    // for the current staging dispatch
    filters: Vec<Filter>,
    appends: Vec<Box<dyn Append>>,

    // stashed dispatches
    dispatches: Vec<Dispatch>,

    // default to trace - the global default is OFF
    max_level: LevelFilter,
}

impl Default for Builder<false> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const READY: bool> Builder<READY> {
    /// Add an [`Append`] to the dispatch under construction.
    pub fn append(mut self, append: impl Append) -> Builder<true> {
        self.appends.push(Box::new(append));

        Builder {
            filters: self.filters,
            appends: self.appends,
            dispatches: self.dispatches,
            max_level: self.max_level,
        }
    }

    /// Set the level passed to [`log::set_max_level`] on apply.
    pub fn max_level(mut self, max_level: LevelFilter) -> Self {
        self.max_level = max_level;
        self
    }
}

impl Builder<false> {
    /// Create a new empty [`Builder`].
    pub fn new() -> Self {
        Self {
            filters: vec![],
            appends: vec![],
            dispatches: vec![],
            max_level: LevelFilter::Trace,
        }
    }

    /// Add a [`Filter`] to the dispatch under construction.
    pub fn filter(mut self, filter: impl Into<Filter>) -> Builder<false> {
        self.filters.push(filter.into());
        self
    }
}

impl Builder<true> {
    /// Stash the current dispatch and start a new staging dispatch with no
    /// filters and appenders configured.
    pub fn dispatch(mut self) -> Builder<false> {
        let dispatch = Dispatch::new(self.filters, self.appends);
        self.dispatches.push(dispatch);

        Builder {
            filters: vec![],
            appends: vec![],
            dispatches: self.dispatches,
            max_level: self.max_level,
        }
    }

    /// Assemble the [`Logger`] with all the dispatches configured.
    pub fn build(mut self) -> Logger {
        let dispatch = Dispatch::new(self.filters, self.appends);
        self.dispatches.push(dispatch);

        Logger::new(self.dispatches, self.max_level)
    }

    /// Assemble the logger and install it as the global logger.
    ///
    /// This should be called early in the execution of a Rust program. Any
    /// log events that occur before installation are ignored.
    ///
    /// # Errors
    ///
    /// Fails if a global logger has already been installed.
    pub fn try_apply(self) -> Result<(), Error> {
        self.build().try_apply()
    }

    /// Assemble the logger and install it as the global logger.
    ///
    /// # Panics
    ///
    /// Panics if a global logger has already been installed.
    pub fn apply(self) {
        self.try_apply()
            .expect("Builder::apply should not be called after the global logger initialized");
    }
}

#[cfg(test)]
mod tests {
    use log::Level;
    use log::Log;

    use crate::append::Testing;

    #[test]
    fn test_builder_assembles_dispatches() {
        let info_sink = Testing::default();
        let error_sink = Testing::default();
        let logger = crate::builder()
            .filter(log::LevelFilter::Info)
            .append(info_sink.clone())
            .dispatch()
            .filter(log::LevelFilter::Error)
            .append(error_sink.clone())
            .build();

        logger.log(
            &log::Record::builder()
                .args(format_args!("only info"))
                .level(Level::Info)
                .target("app")
                .build(),
        );

        assert_eq!(info_sink.captured().len(), 1);
        assert_eq!(error_sink.captured().len(), 0);
    }

    #[test]
    fn test_builder_max_level() {
        let logger = crate::builder()
            .max_level(log::LevelFilter::Warn)
            .append(Testing::default())
            .build();
        assert_eq!(logger.max_level(), log::LevelFilter::Warn);
    }
}
