// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module formats the improving solutions reported by the solver,
//! either as the rows of a fixed width table or as csv records.

use dd_bnb::{Bound, State, Statistics};

use crate::problem::Route;

/// How the improving solutions are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Quiet,
    Table,
    Csv { header: bool },
}

/// The settings of the run, repeated on every line of output
#[derive(Debug, Clone)]
pub struct Run {
    pub instance  : String,
    pub size      : usize,
    pub form      : &'static str,
    pub infer     : &'static str,
    pub relax     : &'static str,
    pub ordering  : &'static str,
    pub width     : usize,
    pub batch     : usize,
    pub workers   : usize,
    pub max_millis: u64,
    pub max_nodes : u64,
}

pub struct Output {
    run: Run,
    format: Format,
}

impl Output {
    pub fn new(run: Run, format: Format) -> Self {
        Output { run, format }
    }
    /// Prints the header (if any)
    pub fn start(&self) {
        if let Some(header) = self.header() {
            println!("{header}");
        }
    }
    /// Prints the improving solution carried by `bound`
    pub fn write<S: State + Route>(&self, bound: &Bound<S>, stats: &Statistics) {
        if let Some(row) = self.row(bound, stats) {
            println!("{row}");
        }
    }

    pub fn header(&self) -> Option<String> {
        match self.format {
            Format::Quiet => None,
            Format::Table => {
                let header = format!("{:<16}{:<7}{:<12}{:<7}{:<7}{:<10}{:<10}{:<7}{:<9}{:<9}{:<9}{:<10}{:<9}{:<10}{:<10}",
                    "instance", "size", "form", "infer", "relax", "ordering", "width", "batch", "workers",
                    "clock", "cpu", "primal", "optimal", "nodes", "fails");
                let header = header.trim_end().to_string();
                let rule   = "=".repeat(header.len());
                Some(format!("{header}\n{rule}"))
            },
            Format::Csv { header: false } => None,
            Format::Csv { header: true  } => Some([
                "instance", "size", "form", "infer", "relax", "ordering", "width", "batch", "workers",
                "maxmillis", "maxnodes", "clock", "cpu", "primal", "optimal", "nodes", "fails", "path",
            ].join(",")),
        }
    }

    pub fn row<S: State + Route>(&self, bound: &Bound<S>, stats: &Statistics) -> Option<String> {
        let run = &self.run;
        match self.format {
            Format::Quiet => None,
            Format::Table => Some(format!(
                "{:<16}{:<7}{:<12}{:<7}{:<7}{:<10}{:<10}{:<7}{:<9}{:<9.3}{:<9.3}{:<10}{:<9}{:<10}{:<10}",
                run.instance, run.size, run.form, run.infer, run.relax, run.ordering, run.width, run.batch, run.workers,
                stats.clock_seconds, stats.cpu_seconds, bound.primal_bound(), stats.optimal,
                stats.nodes, stats.fails)
                .trim_end()
                .to_string()),
            Format::Csv { .. } => Some([
                csv_field(&run.instance),
                run.size.to_string(),
                run.form.to_string(),
                run.infer.to_string(),
                run.relax.to_string(),
                run.ordering.to_string(),
                run.width.to_string(),
                run.batch.to_string(),
                run.workers.to_string(),
                run.max_millis.to_string(),
                run.max_nodes.to_string(),
                format!("{:.10}", stats.clock_seconds),
                format!("{:.10}", stats.cpu_seconds),
                bound.primal_bound().to_string(),
                stats.optimal.to_string(),
                stats.nodes.to_string(),
                stats.fails.to_string(),
                csv_field(&bound.primal.labels().join(" ")),
            ].join(",")),
        }
    }
}

/// Quotes a field when it contains a separator, a quote or a line break
pub fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
