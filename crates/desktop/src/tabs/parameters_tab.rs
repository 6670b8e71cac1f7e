use iced::widget::{button, checkbox, column, pick_list, row, text, text_input};
use iced::{Element, Length};

use crate::app::{App, Message};
use crate::settings::Appearance;

pub fn view(app: &App) -> Element<'_, Message> {
    let field = |label: &'static str, value: &str, on_input: fn(String) -> Message| {
        column![
            text(label).size(11),
            text_input("", value).on_input(on_input).width(140),
        ]
        .spacing(4)
    };

    let decode_params = column![
        text("Decoding Parameters").size(15),
        row![
            field(
                "Temperature",
                &app.temperature_input,
                Message::TemperatureChanged
            ),
            field("Best of", &app.best_of_input, Message::BestOfChanged),
            field("Beam size", &app.beam_size_input, Message::BeamSizeChanged),
        ]
        .spacing(12),
        row![
            field(
                "Log-probability threshold",
                &app.logprob_input,
                Message::LogprobChanged
            ),
            field(
                "No-speech threshold",
                &app.no_speech_input,
                Message::NoSpeechChanged
            ),
        ]
        .spacing(12),
        checkbox(app.settings.condition_on_previous_text)
            .label("Condition on previous text")
            .on_toggle(Message::ConditionToggled),
        row![
            button(text("OK").size(13))
                .padding([6, 18])
                .on_press(Message::ApplyParameters),
            button(text("Restore Defaults").size(13))
                .padding([6, 18])
                .style(button::secondary)
                .on_press(Message::RestoreDefaultParameters),
        ]
        .spacing(8),
    ]
    .spacing(12);

    let appearance = column![
        text("Appearance").size(15),
        pick_list(
            Appearance::ALL,
            Some(app.settings.appearance),
            Message::AppearanceChanged,
        ),
    ]
    .spacing(8);

    column![decode_params, appearance]
        .spacing(24)
        .width(Length::Fill)
        .into()
}
