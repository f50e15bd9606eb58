use crate::options::CropName;
use anyhow::Result;

impl CropName {
    pub fn run(&self) -> Result<()> {
        if self.all {
            for (code, name) in cropcal::cdl::legend() {
                println!("{code:>3} {name}");
            }
            return Ok(());
        }
        for &code in &self.codes {
            match cropcal::cdl::crop_name(code) {
                Some(name) => println!("{code:>3} {name}"),
                None => println!("{code:>3} (unassigned)"),
            }
        }
        Ok(())
    }
}
