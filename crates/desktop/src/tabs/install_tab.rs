use iced::widget::{button, column, container, pick_list, row, scrollable, text, Space};
use iced::{Element, Length};

use voxtitle_core::install::domain::install_record::InstallVersion;

use crate::app::{App, Message};

pub fn view(app: &App) -> Element<'_, Message> {
    let target_row = container(
        row![
            column![
                text("INSTALL TARGET").size(11),
                text(app.env.lib_dir.display().to_string()).size(14),
            ]
            .width(Length::Fill),
            button(text("Open Folder").size(13))
                .padding([6, 14])
                .style(button::secondary)
                .on_press(Message::OpenRuntimeDir),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center),
    )
    .padding([10, 12])
    .style(container::rounded_box)
    .width(Length::Fill);

    let version_row = row![
        column![
            text("Runtime version").size(11),
            pick_list(
                InstallVersion::ALL,
                Some(app.install_version),
                Message::InstallVersionChanged,
            ),
        ]
        .spacing(4),
        Space::new().width(Length::Fill),
        button(text("Download & Install").size(14))
            .padding([8, 20])
            .on_press_maybe((!app.is_installing).then_some(Message::StartInstall)),
        button(text("Verify Installation").size(14))
            .padding([8, 20])
            .style(button::secondary)
            .on_press_maybe((!app.is_installing).then_some(Message::StartVerify)),
        button(text("Recheck").size(14))
            .padding([8, 20])
            .style(button::secondary)
            .on_press(Message::RecheckRuntime),
    ]
    .spacing(8)
    .align_y(iced::Alignment::End);

    let note = text(
        "CUDA installs require a supported CUDA toolkit (11.8, 12.6 or 12.8) on PATH; \
         unsupported toolkits are refused before any file is touched.",
    )
    .size(12);

    let log = scrollable(
        column(
            app.install_log
                .iter()
                .map(|line| text(line.as_str()).size(12).into())
                .collect::<Vec<_>>(),
        )
        .spacing(2),
    )
    .height(Length::Fill);

    column![
        target_row,
        version_row,
        note,
        text("Installation Log:").size(11),
        container(log)
            .padding(8)
            .style(container::rounded_box)
            .width(Length::Fill)
            .height(Length::Fill),
    ]
    .spacing(10)
    .height(Length::Fill)
    .into()
}
