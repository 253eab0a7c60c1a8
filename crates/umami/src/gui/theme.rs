use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

pub struct ThemeColors {
    pub bowl: Srgba<f64>,
    pub bowl_rim: Srgba<f64>,
    pub label: Srgba<f64>,
    pub tray: Srgba<f64>,
    pub tray_grain: Srgba<f64>,
    pub feature: Srgba<f64>,
    pub feature_stripe: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            bowl: Self::lookup_color(
                context,
                "umami_bowl_color",
                Srgba::new(0.93, 0.89, 0.82, 1.0),
                None,
            ),
            bowl_rim: Self::lookup_color(
                context,
                "umami_accent_color",
                Srgba::new(0.78, 0.22, 0.12, 1.0),
                None,
            ),
            label: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.12, 0.1, 0.08, 1.0),
                Some(0.9),
            ),
            tray: Self::lookup_color(
                context,
                "umami_wood_color",
                Srgba::new(0.55, 0.36, 0.2, 1.0),
                None,
            ),
            tray_grain: Self::lookup_color(
                context,
                "umami_wood_grain_color",
                Srgba::new(0.4, 0.25, 0.13, 0.6),
                Some(0.6),
            ),
            feature: Self::lookup_color(
                context,
                "umami_feature_color",
                Srgba::new(0.96, 0.93, 0.87, 1.0),
                None,
            ),
            feature_stripe: Self::lookup_color(
                context,
                "umami_feature_stripe_color",
                Srgba::new(0.89, 0.84, 0.75, 0.5),
                Some(0.5),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
@define-color umami_bowl_color #efe3d0;
@define-color umami_accent_color #c7381f;
@define-color umami_wood_color #8c5c33;
@define-color umami_wood_grain_color #66401f;
@define-color umami_feature_color #f5eddf;
@define-color umami_feature_stripe_color #e3d6bf;

.umami-home {
    background-color: #1b1410;
}
.umami-about {
    background-color: #f6efe4;
    padding: 64px;
}
.umami-about .title-1 {
    color: #1b1410;
}
.umami-try-now {
    background: @umami_accent_color;
    color: white;
    font-weight: bold;
    padding: 12px 32px;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
