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

use std::fmt;

/// A helper to format a record's key-value pairs, each pair prefixed with the
/// given separator.
pub(crate) struct KvDisplay<'kvs> {
    kv: &'kvs dyn log::kv::Source,
    separator: &'kvs str,
}

impl<'kvs> KvDisplay<'kvs> {
    pub(crate) fn new(kv: &'kvs dyn log::kv::Source, separator: &'kvs str) -> Self {
        Self { kv, separator }
    }
}

impl fmt::Display for KvDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut visitor = KvWriter {
            writer: f,
            separator: self.separator,
        };
        self.kv.visit(&mut visitor).ok();
        Ok(())
    }
}

struct KvWriter<'a, 'kvs> {
    writer: &'kvs mut fmt::Formatter<'a>,
    separator: &'kvs str,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvWriter<'_, 'kvs> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        write!(self.writer, "{}{key}={value}", self.separator)?;
        Ok(())
    }
}

/// Collects a record's key-value pairs for structured output.
pub(crate) fn collect_kvs(kv: &dyn log::kv::Source) -> Vec<(String, String)> {
    let mut collector = KvCollector { kv: Vec::new() };
    kv.visit(&mut collector).ok();
    collector.kv
}

struct KvCollector {
    kv: Vec<(String, String)>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.kv.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
