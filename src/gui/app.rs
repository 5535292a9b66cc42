use iced::widget::{button, column, container, image as picture, row, text};
use iced::{ContentFit, Element, Length, Task};
use image::RgbImage;

use super::Message;

/// Window showing one annotated image.
#[derive(Debug, Clone)]
pub struct ViewerApp {
    handle: picture::Handle,
    source: RgbImage,
    fit: ContentFit,
    status: Option<String>,
}

impl ViewerApp {
    pub fn new(image: &RgbImage) -> Self {
        let rgba = image::DynamicImage::ImageRgb8(image.clone()).to_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            handle: picture::Handle::from_rgba(width, height, rgba.into_raw()),
            source: image.clone(),
            fit: ContentFit::Contain,
            status: None,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ToggleFit => {
                self.fit = if self.fit == ContentFit::Contain {
                    ContentFit::None
                } else {
                    ContentFit::Contain
                };
            }
            Message::Save => {
                let target = rfd::FileDialog::new()
                    .set_file_name("annotated.png")
                    .add_filter("PNG image", &["png"])
                    .save_file();
                if let Some(path) = target {
                    self.status = Some(match crate::display::save(&self.source, &path) {
                        Ok(()) => format!("Saved {}", path.display()),
                        Err(e) => format!("Save failed: {:#}", e),
                    });
                }
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fit_label = if self.fit == ContentFit::Contain {
            "Actual size"
        } else {
            "Fit to window"
        };

        let controls = row![
            button(fit_label).on_press(Message::ToggleFit),
            button("Save as...").on_press(Message::Save),
            text(self.status.as_deref().unwrap_or_default()),
        ]
        .spacing(10);

        let scene = picture(self.handle.clone())
            .content_fit(self.fit)
            .width(Length::Fill)
            .height(Length::Fill);

        container(column![controls, scene].spacing(10))
            .padding(10)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}
