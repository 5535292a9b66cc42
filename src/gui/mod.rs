mod app;
mod message;

pub use app::ViewerApp;
pub use message::Message;

use image::RgbImage;

/// Run the viewer until its window is closed.
pub fn view_image(image: &RgbImage, title: &str) -> anyhow::Result<()> {
    let app = ViewerApp::new(image);
    let title = title.to_string();

    iced::application(move || app.clone(), ViewerApp::update, ViewerApp::view)
        .title(move |_: &ViewerApp| title.clone())
        .run()
        .map_err(|e| anyhow::anyhow!("viewer window failed: {}", e))
}
