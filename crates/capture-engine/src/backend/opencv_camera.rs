//! OpenCV webcam capture and highgui preview.

use ::opencv::core::{self, Mat, Point, Scalar};
use ::opencv::prelude::*;
use ::opencv::{highgui, imgproc, videoio};

use handmouse_common::clock::SessionClock;
use handmouse_common::config::CameraConfig;
use handmouse_common::error::{HandmouseError, HandmouseResult};

use crate::camera::{CameraOpener, Frame, FrameData, FrameRead, FrameSource};
use crate::preview::{Overlay, PreviewWindow};

fn cv_err(context: &str) -> impl Fn(::opencv::Error) -> HandmouseError + '_ {
    move |e| HandmouseError::camera(format!("{context}: {e}"))
}

/// Opens V4L/DirectShow/AVFoundation cameras through `VideoCapture`.
#[derive(Debug, Clone)]
pub struct OpenCvCameraOpener {
    config: CameraConfig,
    flip: bool,
}

impl OpenCvCameraOpener {
    /// `flip` mirrors frames horizontally, so the user's right hand appears
    /// on the right of the image.
    pub fn new(config: &CameraConfig, flip: bool) -> Self {
        Self {
            config: config.clone(),
            flip,
        }
    }
}

impl CameraOpener for OpenCvCameraOpener {
    type Source = OpenCvCamera;

    fn open(&mut self, index: u32) -> HandmouseResult<OpenCvCamera> {
        let mut capture = videoio::VideoCapture::new(index as i32, videoio::CAP_ANY)
            .map_err(cv_err("VideoCapture::new"))?;
        if !capture.is_opened().map_err(cv_err("is_opened"))? {
            return Err(HandmouseError::camera(format!(
                "camera {index} did not open"
            )));
        }
        // Best effort; drivers are free to ignore the requested size.
        let _ = capture.set(videoio::CAP_PROP_FRAME_WIDTH, self.config.width as f64);
        let _ = capture.set(videoio::CAP_PROP_FRAME_HEIGHT, self.config.height as f64);
        let _ = capture.set(videoio::CAP_PROP_BUFFERSIZE, 1.0);

        Ok(OpenCvCamera {
            capture,
            index,
            flip: self.flip,
            clock: SessionClock::start(),
            seq: 0,
            released: false,
        })
    }
}

/// An open webcam.
pub struct OpenCvCamera {
    capture: videoio::VideoCapture,
    index: u32,
    flip: bool,
    clock: SessionClock,
    seq: u64,
    released: bool,
}

impl OpenCvCamera {
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl FrameSource for OpenCvCamera {
    fn name(&self) -> &str {
        "opencv-camera"
    }

    fn read(&mut self) -> HandmouseResult<FrameRead> {
        if self.released {
            return Ok(FrameRead::Exhausted);
        }

        let mut raw = Mat::default();
        let ok = self
            .capture
            .read(&mut raw)
            .map_err(cv_err("VideoCapture::read"))?;
        if !ok || raw.empty() {
            return Ok(FrameRead::Missed);
        }

        let image = if self.flip {
            let mut flipped = Mat::default();
            core::flip(&raw, &mut flipped, 1).map_err(cv_err("flip"))?;
            flipped
        } else {
            raw
        };

        let seq = self.seq;
        self.seq += 1;
        Ok(FrameRead::Frame(Frame {
            seq,
            width: image.cols().max(0) as u32,
            height: image.rows().max(0) as u32,
            t: self.clock.elapsed_secs(),
            data: FrameData::Image(image),
        }))
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.capture.release() {
            tracing::warn!(error = %e, "Failed to release camera");
        }
        self.released = true;
        tracing::info!(index = self.index, "Camera released");
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        self.release();
    }
}

/// highgui window showing the camera feed with action labels.
pub struct HighGuiPreview {
    title: String,
    open: bool,
}

impl HighGuiPreview {
    pub fn new(title: impl Into<String>) -> HandmouseResult<Self> {
        let title = title.into();
        highgui::named_window(&title, highgui::WINDOW_AUTOSIZE)
            .map_err(cv_err("named_window"))?;
        Ok(Self { title, open: true })
    }

    fn draw_text(image: &mut Mat, text: &str, row: i32) -> HandmouseResult<()> {
        imgproc::put_text(
            image,
            text,
            Point::new(10, 30 + row * 30),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.8,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            2,
            imgproc::LINE_8,
            false,
        )
        .map_err(cv_err("put_text"))
    }
}

impl PreviewWindow for HighGuiPreview {
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> HandmouseResult<()> {
        let FrameData::Image(image) = &frame.data else {
            return Ok(());
        };
        let mut canvas = image.try_clone().map_err(cv_err("clone"))?;
        for (row, label) in overlay.labels.iter().enumerate() {
            Self::draw_text(&mut canvas, label, row as i32)?;
        }
        if let Some(held) = overlay.stop_hold_secs {
            let row = overlay.labels.len() as i32;
            Self::draw_text(&mut canvas, &format!("STOP HOLD {held:.1}s"), row)?;
        }
        highgui::imshow(&self.title, &canvas).map_err(cv_err("imshow"))
    }

    fn poll_key(&mut self) -> HandmouseResult<Option<i32>> {
        let key = highgui::wait_key(1).map_err(cv_err("wait_key"))?;
        Ok((key >= 0).then_some(key & 0xff))
    }

    fn release(&mut self) {
        if self.open {
            let _ = highgui::destroy_window(&self.title);
            self.open = false;
        }
    }
}

impl Drop for HighGuiPreview {
    fn drop(&mut self) {
        self.release();
    }
}
