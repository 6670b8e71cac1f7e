use iced::widget::{
    button, column, container, pick_list, progress_bar, row, scrollable, text, text_input, Space,
};
use iced::{Element, Length};

use voxtitle_core::shared::constants::LANGUAGES;
use voxtitle_core::shared::timestamp::format_clock;
use voxtitle_core::transcript::domain::model_size::ModelSize;

use crate::app::{App, Message};

pub fn view(app: &App) -> Element<'_, Message> {
    let file_name = app
        .current_file
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string());

    let file_row = container(
        row![
            column![
                text("AUDIO FILE").size(11),
                match file_name {
                    Some(name) => text(name).size(15),
                    None => text("No file selected").size(15),
                },
            ]
            .width(Length::Fill),
            button(text("Select Audio File").size(13))
                .padding([6, 14])
                .on_press(Message::SelectAudioFile)
                .style(button::secondary),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
    )
    .padding([10, 12])
    .style(container::rounded_box)
    .width(Length::Fill);

    let selected_language = LANGUAGES
        .iter()
        .copied()
        .find(|l| *l == app.settings.language);

    let controls = row![
        column![
            text("Model").size(11),
            pick_list(ModelSize::ALL, Some(app.settings.model), Message::ModelChanged),
        ]
        .spacing(4),
        column![
            text("Language").size(11),
            pick_list(LANGUAGES, selected_language, Message::LanguageChanged),
        ]
        .spacing(4),
        column![
            text("Keyword (optional)").size(11),
            text_input("topic hint", &app.keyword).on_input(Message::KeywordChanged),
        ]
        .spacing(4)
        .width(Length::Fill),
    ]
    .spacing(12);

    let transcribe_button = button(text("Start Transcription").size(15))
        .padding([10, 24])
        .on_press_maybe((!app.is_transcribing).then_some(Message::StartTranscription));

    let mut status_column = column![
        row![
            text(app.status_line.as_str()).size(13).width(Length::Fill),
            text(format!("Elapsed: {}", app.elapsed)).size(13),
            text(format!(
                "Duration: {}",
                format_clock(app.audio_duration as u64)
            ))
            .size(13),
        ]
        .spacing(16),
    ]
    .spacing(6);
    if let Some(progress) = app.progress {
        status_column = status_column.push(progress_bar(0.0..=100.0, progress).girth(8));
    }

    let status_log = scrollable(
        column(
            app.status_log
                .iter()
                .map(|line| text(line.as_str()).size(12).into())
                .collect::<Vec<_>>(),
        )
        .spacing(2),
    )
    .height(90);

    let transcript_log = scrollable(
        column(
            app.transcript_log
                .iter()
                .map(|line| text(line.as_str()).size(13).into())
                .collect::<Vec<_>>(),
        )
        .spacing(4),
    )
    .height(Length::Fill);

    let save_row = row![
        button(text("Clear").size(13))
            .padding([6, 14])
            .style(button::secondary)
            .on_press(Message::ClearOutput),
        Space::new().width(Length::Fill),
        button(text("Save Transcription").size(13))
            .padding([6, 14])
            .on_press(Message::SaveTranscription),
        button(text("Save Subtitle File").size(13))
            .padding([6, 14])
            .on_press(Message::SaveSubtitle),
    ]
    .spacing(8);

    column![
        file_row,
        controls,
        transcribe_button,
        status_column,
        text("System Status:").size(11),
        container(status_log)
            .padding(8)
            .style(container::rounded_box)
            .width(Length::Fill),
        text("Transcription Output:").size(11),
        container(transcript_log)
            .padding(8)
            .style(container::rounded_box)
            .width(Length::Fill)
            .height(Length::Fill),
        save_row,
    ]
    .spacing(10)
    .height(Length::Fill)
    .into()
}
