use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use parse_display::{Display, FromStr};
use serde_json::json;

use crate::report::Report;
use crate::utils::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Display, FromStr)]
#[serde(rename_all = "lowercase")]
#[display(style = "lowercase")]
pub enum Format {
    Text,
    Json,
    Yaml,
}

impl Default for Format {
    fn default() -> Self {
        Format::Text
    }
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: Format,
    /// Also dump the final process table in text format
    #[serde(default)]
    pub dump_table: bool,
    /// Write per-process rows to `<dir>/<algorithm>.csv`
    #[serde(default)]
    pub csv: bool,
    /// Write the slices to `<dir>/<algorithm>.trace.json`, loadable in chrome://tracing
    #[serde(default)]
    pub chrome_trace: bool,
    #[serde(default = "OutputDir::default_dir")]
    pub dir: OutputDir,
}

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct OutputDir(PathBuf);

impl OutputDir {
    fn default_dir() -> Self {
        Self(PathBuf::from("output"))
    }

    /// Path of a file in the dir, creating the dir if needed
    pub fn file(&self, name: impl AsRef<Path>) -> Result<PathBuf> {
        fs::create_dir_all(&self.0)?;
        Ok(self.0.join(name))
    }
}

/// Print the report to `writer` and write any extra files asked for
pub fn render(report: &Report, cfg: &OutputConfig, mut writer: impl Write) -> Result<()> {
    match cfg.format {
        Format::Text => {
            render_text(report, &mut writer)?;
            if cfg.dump_table {
                writeln!(writer, "-- final process table --")?;
                report.table.printall(&mut writer)?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
        Format::Yaml => serde_yaml::to_writer(&mut writer, report)?,
    }
    writer.flush()?;

    write_files(report, cfg)
}

/// Same as `render`, for several runs over the same workload
pub fn render_comparison(reports: &[Report], cfg: &OutputConfig, mut writer: impl Write) -> Result<()> {
    match cfg.format {
        Format::Text => {
            for report in reports {
                render_text(report, &mut writer)?;
                writeln!(writer)?;
            }
            let summary = reports
                .iter()
                .map(|r| format!("{} {:.2}", r.algorithm, r.average_wait))
                .join(", ");
            writeln!(writer, "Average wait time: {}", summary)?;
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut writer, reports)?;
            writeln!(writer)?;
        }
        Format::Yaml => serde_yaml::to_writer(&mut writer, reports)?,
    }
    writer.flush()?;

    reports
        .iter()
        .try_for_each(|report| write_files(report, cfg))
}

fn write_files(report: &Report, cfg: &OutputConfig) -> Result<()> {
    let algorithm = report.algorithm.algorithm();
    if cfg.csv {
        let path = cfg.dir.file(format!("{}.csv", algorithm))?;
        render_csv(report, File::create(&path)?)?;
        info!(path = %path.display(), "wrote per-process csv");
    }
    if cfg.chrome_trace {
        let path = cfg.dir.file(format!("{}.trace.json", algorithm))?;
        render_chrome_trace(report, BufWriter::new(File::create(&path)?))?;
        info!(path = %path.display(), "wrote chrome trace");
    }
    Ok(())
}

pub fn render_text(report: &Report, mut writer: impl Write) -> Result<()> {
    writeln!(writer, "== {} ==", report.algorithm)?;
    for p in report.processes.iter() {
        writeln!(
            writer,
            "PID {}: burst={}, wait={}, turnaround={}",
            p.pid, p.burst, p.wait, p.turnaround
        )?;
    }
    writeln!(writer, "Average wait time: {:.2}", report.average_wait)?;
    writeln!(writer, "Average turnaround time: {:.2}", report.average_turnaround)?;
    writeln!(writer, "Total elapsed time: {}", report.elapsed)?;
    Ok(())
}

pub fn render_csv(report: &Report, writer: impl Write) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for p in report.processes.iter() {
        csv.serialize(p)?;
    }
    csv.flush()?;
    Ok(())
}

fn event_line(writer: impl io::Write, val: serde_json::Value) -> Result<()> {
    event_line_with_ending(writer, val, true)
}

fn event_line_with_ending(mut writer: impl io::Write, val: serde_json::Value, ending: bool) -> Result<()> {
    serde_json::to_writer(&mut writer, &val)?;
    if ending {
        writer.write_all(b",\n")?;
    }
    Ok(())
}

/// Each slice becomes a complete event on the thread of its process
pub fn render_chrome_trace(report: &Report, mut writer: impl Write) -> Result<()> {
    writer.write_all(b"{\"traceEvents\":[\n")?;

    for slice in report.schedule.slices.iter() {
        event_line(
            &mut writer,
            json!({
                "name": format!("PID {}", slice.pid),
                "ph": "X",
                "cat": "exec",
                "ts": slice.start,
                "dur": slice.duration,
                "pid": 0,
                "tid": slice.pid,
                "args": {
                    "pid": slice.pid,
                }
            }),
        )?;
    }
    for p in report.processes.iter() {
        event_line(
            &mut writer,
            json!({
                "name": "thread_name",
                "ph": "M",
                "pid": 0,
                "tid": p.pid,
                "args": {
                    "name": format!("PID {} (burst {}, wait {})", p.pid, p.burst, p.wait)
                }
            }),
        )?;
    }
    event_line_with_ending(
        &mut writer,
        json!({
            "name": "process_name",
            "ph": "M",
            "pid": 0,
            "args": {
                "name": report.algorithm.to_string()
            }
        }),
        false,
    )?;

    writer.write_all(b"\n],\"summary\":")?;
    serde_json::to_writer(
        &mut writer,
        &json!({
            "algorithm": report.algorithm,
            "elapsed": report.elapsed,
            "average_wait": report.average_wait,
        }),
    )?;
    writer.write_all(b"\n}")?;
    writer.flush()?;
    Ok(())
}
