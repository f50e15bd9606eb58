//! Rendered previews of the selected scenes.

use crate::{select::BestImages, ScenesError};

/// Rendered preview URLs of both selected scenes, as (A, B).
pub fn preview_hrefs(best: &BestImages) -> Result<(&str, &str), ScenesError> {
    Ok((best.a.preview_href()?, best.b.preview_href()?))
}

/// Side-by-side HTML snippet showing both previews.
pub fn preview_html(best: &BestImages) -> Result<String, ScenesError> {
    let (href_a, href_b) = preview_hrefs(best)?;
    Ok(format!(
        r#"<div style="display: flex; gap: 5%">
    <div width="50%">
        <h4>Window A</h4>
        <img src="{}" style="max-width: 100%; max-height: 50vh" />
    </div>
    <div width="50%">
        <h4>Window B</h4>
        <img src="{}" style="max-width: 100%; max-height: 50vh" />
    </div>
</div>
"#,
        escape_attr(href_a),
        escape_attr(href_b)
    ))
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::{preview_hrefs, preview_html};
    use crate::{
        item::{tests::item, Asset, PREVIEW_ASSET},
        select::BestImages,
        ScenesError,
    };
    use chrono::NaiveDate;

    fn best(with_previews: bool) -> BestImages {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let mut a = item("a", date, Some(1.0));
        let mut b = item("b", date, Some(2.0));
        if with_previews {
            for (it, href) in [(&mut a, "https://pc/a.png?x=1&y=2"), (&mut b, "https://pc/b.png")] {
                it.assets.insert(
                    PREVIEW_ASSET.to_owned(),
                    Asset {
                        href: href.to_owned(),
                        media_type: Some("image/png".to_owned()),
                        title: None,
                    },
                );
            }
        }
        BestImages { a, b }
    }

    #[test]
    fn test_preview_html() {
        let best = best(true);
        assert_eq!(
            preview_hrefs(&best).unwrap(),
            ("https://pc/a.png?x=1&y=2", "https://pc/b.png")
        );
        let html = preview_html(&best).unwrap();
        assert!(html.contains("<h4>Window A</h4>"));
        assert!(html.contains(r#"src="https://pc/a.png?x=1&amp;y=2""#));
        assert!(html.find("a.png").unwrap() < html.find("b.png").unwrap());
    }

    #[test]
    fn test_missing_preview() {
        assert!(matches!(
            preview_html(&best(false)),
            Err(ScenesError::MissingAsset { item, .. }) if item == "a"
        ));
    }
}
