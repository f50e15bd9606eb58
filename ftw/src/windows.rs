use crate::options::{Season, Windows};
use anyhow::{bail, Result};
use scenes::{SeasonWindows, Window};

impl Season {
    /// Search windows from explicit dates, or from the crop calendars
    /// at `--point`.
    pub fn windows(&self) -> Result<SeasonWindows> {
        match (&self.sos, &self.eos, self.point) {
            (Some(sos), Some(eos), _) => Ok(SeasonWindows::from_iso(sos, eos)?),
            (_, _, Some(point)) => {
                let dates = self.calendar.sample(point)?;
                Ok(SeasonWindows::new(dates.start, dates.end))
            }
            _ => bail!("either --sos and --eos or --point is required"),
        }
    }
}

impl Windows {
    pub fn run(&self) -> Result<()> {
        let windows = self.season.windows()?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&windows)?);
        } else {
            for window in [Window::A, Window::B] {
                println!("window {window}: {}", windows.get(window));
            }
        }
        Ok(())
    }
}
