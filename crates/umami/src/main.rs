use relm4::prelude::*;
use umami::config;
use umami::gui::app::AppModel;
use umami::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx, config.clone());

    let app = RelmApp::new("org.umami.landing");

    app.run::<AppModel>((config, rx));
}
