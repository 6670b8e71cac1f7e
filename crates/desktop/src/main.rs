mod app;
mod dialogs;
mod settings;
mod tabs;
mod theme;
mod workers;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    iced::application(App::new, App::update, App::view)
        .title("VoxTitle \u{2014} Audio Subtitle System")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(760.0, 640.0),
            ..Default::default()
        })
        .run()
}
