use crate::options::{Calendar, CalendarArgs, LatLon};
use anyhow::{Context, Result};
use cropcal::{geo::Coord, season_dates, SeasonDates};

impl CalendarArgs {
    /// Samples this season's crop calendars at `point`.
    pub fn sample(&self, point: LatLon) -> Result<SeasonDates> {
        let (sos_tif, eos_tif) = self.season.file_names().paths_in(&self.calendar_dir);
        let coord = Coord {
            x: point.lon,
            y: point.lat,
        };
        season_dates(coord, &sos_tif, &eos_tif, self.year).with_context(|| {
            format!(
                "sampling {} season calendars {sos_tif:?}, {eos_tif:?}",
                self.season
            )
        })
    }
}

impl Calendar {
    pub fn run(&self) -> Result<()> {
        let dates = self.calendar.sample(self.point)?;
        println!(
            "{} season at {},{}: day {} to day {}",
            self.calendar.season, self.point.lat, self.point.lon, dates.start_day, dates.end_day
        );
        println!("start: {}", dates.start);
        println!("end:   {}", dates.end);
        Ok(())
    }
}
