use std::{io::stdout, io::Write, sync::*, time::Instant};

pub trait Progress {
    fn stage(&mut self, text: &str);
    fn set_total(&mut self, total: usize);
    fn progress(&mut self, step: bool, text: &str);
    fn finish(&mut self) {}
}

pub type ProgressTs = Arc<Mutex<dyn Progress + Send>>;

/// Files per second
fn calc_rate(pos: usize, elapsed: f64) -> f64 {
    if elapsed > 0.0 { pos as f64 / elapsed } else { 0.0 }
}

/// Seconds left at current rate. `None` while rate is unknown.
fn calc_eta(pos: usize, total: usize, rate: f64) -> Option<f64> {
    if rate <= 0.0 { return None; }
    Some(total.saturating_sub(pos) as f64 / rate)
}

/// `mm:ss` or `h:mm:ss`
fn format_secs(secs: f64) -> String {
    let secs = secs.max(0.0).round() as u64;
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 { format!("{}:{:02}:{:02}", h, m, s) } else { format!("{:02}:{:02}", m, s) }
}

pub struct ProgressConsole {
    label: String,
    pos: usize,
    total: usize,
    start: Instant,
    prev_text: String,
}

impl ProgressConsole {
    pub fn new() -> ProgressConsole {
        ProgressConsole {
            label: String::new(),
            pos: 0,
            total: 1,
            start: Instant::now(),
            prev_text: String::new(),
        }
    }

    pub fn new_ts() -> ProgressTs {
        Arc::new(Mutex::new(
            ProgressConsole::new()
        ))
    }

    fn show_progress(&mut self, text: &str) {
        const MAX_WIDTH: usize = 30;
        let total = self.total.max(1);
        let width = (MAX_WIDTH * self.pos / total).min(MAX_WIDTH);
        let percent = (100 * self.pos / total).min(100);
        let elapsed = self.start.elapsed().as_secs_f64();
        let rate = calc_rate(self.pos, elapsed);
        let eta = calc_eta(self.pos, self.total, rate)
            .map(format_secs)
            .unwrap_or_else(|| "?".to_string());
        let mut out = stdout().lock();
        let _ = write!(
            out,
            "{} {:3}% [{}{}] {}/{} [{}<{}, {:.2} file/s] {}                   \r",
            self.label,
            percent,
            "#".repeat(width),
            "-".repeat(MAX_WIDTH - width),
            self.pos,
            self.total,
            format_secs(elapsed),
            eta,
            rate,
            text
        );
        let _ = out.flush();
        if text != self.prev_text { log::debug!("{}: {}", self.label, text); }
        self.prev_text = text.to_string();
    }
}

impl Progress for ProgressConsole {
    fn stage(&mut self, text: &str) {
        if self.pos != 0 {
            println!();
            self.pos = 0;
        }
        self.label = text.to_string();
    }

    fn set_total(&mut self, total: usize) {
        self.total = total;
        self.pos = 0;
        self.start = Instant::now();
        self.show_progress("");
    }

    fn progress(&mut self, step: bool, text: &str) {
        if step { self.pos += 1; }
        self.show_progress(text);
    }

    fn finish(&mut self) {
        println!();
        self.pos = 0;
    }
}

pub struct ProgressCallBack {
    pos: usize,
    total: usize,
    stage_cb: Box<dyn Fn(&str) + Send + 'static>,
    progress_cb: Box<dyn Fn(usize, usize, &str) + Send + 'static>,
}

impl ProgressCallBack {
    pub fn new_ts<SF, PF>(stage_fun: SF, progress_fun: PF) -> ProgressTs
    where
        SF: Fn(&str) + Send + 'static,
        PF: Fn(usize, usize, &str) + Send + 'static,
    {
        Arc::new(Mutex::new(ProgressCallBack {
            pos: 0,
            total: 0,
            stage_cb: Box::new(stage_fun),
            progress_cb: Box::new(progress_fun),
        }))
    }
}

impl Progress for ProgressCallBack {
    fn stage(&mut self, text: &str) {
        (*self.stage_cb)(text);
    }

    fn set_total(&mut self, total: usize) {
        self.total = total;
        self.pos = 0;
    }

    fn progress(&mut self, step: bool, text: &str) {
        if step { self.pos += 1; }
        (*self.progress_cb)(self.pos, self.total, text);
    }
}
