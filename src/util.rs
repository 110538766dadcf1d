// Colored `file:line [thread] message` lines. The viewer and the pipeline log from different threads.
pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  use std::io::Write;
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Yellow,
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let thread = std::thread::current();
  let s = format!("{:30}{:12}{}",
    format!("{}:{}",
      record.file().unwrap_or("?"),
      record.line().unwrap_or(0),
    ),
    format!("[{}]", thread.name().unwrap_or("?")),
    record.args()
  );
  writeln!(buf, "{}", style.value(s))
}
