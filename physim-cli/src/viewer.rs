//! Interactive trajectory viewer
//!
//! Plays back the histories recorded by a run: play/pause, a time slider,
//! trails and body labels. Planar runs draw x/y directly; spatial runs are
//! projected and can be orbited by dragging. The scenario file is watched
//! and re-simulated when it changes.

use eframe::egui;
use glam::DVec3;
use log::{error, info};
use notify::{Event, RecommendedWatcher, Watcher};
use physim_core::{run_scenario_with, Body, RenderError, Renderer, Vector};
use std::path::PathBuf;
use std::sync::mpsc;

const PALETTE: [egui::Color32; 6] = [
    egui::Color32::from_rgb(99, 110, 250),
    egui::Color32::from_rgb(239, 85, 59),
    egui::Color32::from_rgb(0, 204, 150),
    egui::Color32::from_rgb(171, 99, 250),
    egui::Color32::from_rgb(255, 161, 90),
    egui::Color32::from_rgb(25, 211, 243),
];

/// Recorded path of one body, embedded in 3D
#[derive(Debug, Clone)]
pub struct Track {
    pub name: String,
    pub times: Vec<f64>,
    pub points: Vec<DVec3>,
}

/// Renderer that copies the handed-off histories for playback
#[derive(Debug, Default)]
pub struct TrackRecorder {
    pub dims: usize,
    pub tracks: Vec<Track>,
}

impl<V: Vector> Renderer<V> for TrackRecorder {
    fn render(&mut self, dims: usize, bodies: &[Body<V>]) -> Result<(), RenderError> {
        self.dims = dims;
        self.tracks = bodies
            .iter()
            .map(|body| Track {
                name: body.name.clone(),
                times: body.history().time().to_vec(),
                points: body.history().position().iter().map(|p| p.to_xyz()).collect(),
            })
            .collect();
        Ok(())
    }
}

impl TrackRecorder {
    fn samples(&self) -> usize {
        self.tracks.iter().map(|t| t.points.len()).max().unwrap_or(0)
    }

    fn time_at(&self, frame: usize) -> Option<f64> {
        self.tracks.first().and_then(|t| t.times.get(frame).copied())
    }
}

/// Simulate the scenario at `path` and record its trajectories
pub fn simulate_file(path: &PathBuf) -> Result<TrackRecorder, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let mut recorder = TrackRecorder::default();
    run_scenario_with(&source, &mut recorder)?;
    Ok(recorder)
}

/// Move the playhead by `speed` samples per repaint, carrying the fractional
/// part so slow speeds still advance. Returns the new frame and carry.
fn advance_playback(frame: usize, carry: f32, speed: f32, last_frame: usize) -> (usize, f32) {
    let position = carry + speed.max(0.0);
    let whole = position.floor();
    ((frame + whole as usize).min(last_frame), position - whole)
}

/// Trajectory playback application
pub struct ViewerApp {
    source_path: PathBuf,
    recording: Option<TrackRecorder>,
    last_load_error: Option<String>,
    frame: usize,
    frame_carry: f32,
    playing: bool,
    speed_multiplier: f32,
    show_trails: bool,
    yaw: f32,
    pitch: f32,
    #[allow(dead_code)] // Kept alive to maintain file watching
    file_watcher: Option<RecommendedWatcher>,
    file_receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ViewerApp {
    pub fn new(source_path: PathBuf, _cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            // The receiver may already be gone during shutdown
            let _ = tx.send(res);
        })
        .ok();

        if let Some(ref mut w) = watcher {
            if let Err(e) = w.watch(&source_path, notify::RecursiveMode::NonRecursive) {
                error!("cannot watch {}: {}", source_path.display(), e);
            }
        }

        let mut app = Self {
            source_path,
            recording: None,
            last_load_error: None,
            frame: 0,
            frame_carry: 0.0,
            playing: false,
            speed_multiplier: 1.0,
            show_trails: true,
            yaw: 0.6,
            pitch: 0.4,
            file_watcher: watcher,
            file_receiver: rx,
        };

        app.reload();
        app
    }

    fn reload(&mut self) {
        match simulate_file(&self.source_path) {
            Ok(recording) => {
                info!(
                    "loaded {} trajectories of {} samples",
                    recording.tracks.len(),
                    recording.samples()
                );
                self.recording = Some(recording);
                self.last_load_error = None;
                self.frame = 0;
                self.frame_carry = 0.0;
            }
            Err(e) => {
                self.last_load_error = Some(format!("{}", e));
                self.recording = None;
                self.playing = false;
            }
        }
    }

    fn check_file_changes(&mut self) {
        let mut needs_reload = false;
        while let Ok(event) = self.file_receiver.try_recv() {
            match event {
                Ok(Event {
                    kind: notify::EventKind::Modify(_),
                    paths,
                    ..
                }) => {
                    if paths.contains(&self.source_path) {
                        needs_reload = true;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("file watcher error: {}", e);
                }
            }
        }

        if needs_reload {
            info!("{} changed, re-simulating", self.source_path.display());
            self.reload();
        }
    }

    /// Map a world point to the view plane
    fn project(&self, dims: usize, p: DVec3) -> egui::Vec2 {
        if dims < 3 {
            return egui::vec2(p.x as f32, -(p.y as f32));
        }
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let (x, y, z) = (p.x as f32, p.y as f32, p.z as f32);
        // Rotate about the vertical axis, then tilt toward the viewer
        let x1 = cy * x - sy * y;
        let y1 = sy * x + cy * y;
        egui::vec2(x1, -(cp * z - sp * y1))
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_file_changes();

        let samples = self.recording.as_ref().map_or(0, TrackRecorder::samples);
        let last_frame = samples.saturating_sub(1);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                    if self.frame >= last_frame {
                        self.frame = 0;
                    }
                    self.playing = !self.playing;
                }

                if ui.button("⏮ Reset").clicked() {
                    self.frame = 0;
                    self.frame_carry = 0.0;
                    self.playing = false;
                }

                if ui.button("⏭ Step").clicked() {
                    self.frame = (self.frame + 1).min(last_frame);
                }

                ui.separator();

                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.speed_multiplier, 0.1..=10.0));

                ui.checkbox(&mut self.show_trails, "Trails");
            });

            ui.horizontal(|ui| {
                ui.add(egui::Slider::new(&mut self.frame, 0..=last_frame).text("sample"));
                if let Some(t) = self.recording.as_ref().and_then(|r| r.time_at(self.frame)) {
                    ui.label(format!("Time: {:.2}", t));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) =
                ui.allocate_painter(ui.available_size(), egui::Sense::drag());
            let rect = response.rect;

            let dims = self.recording.as_ref().map_or(0, |r| r.dims);
            if dims == 3 && response.dragged() {
                let delta = response.drag_delta();
                self.yaw += delta.x * 0.01;
                self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.5, 1.5);
            }

            let Some(recording) = self.recording.as_ref() else {
                if let Some(ref error) = self.last_load_error {
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("Error: {}", error),
                        egui::FontId::proportional(16.0),
                        egui::Color32::RED,
                    );
                }
                return;
            };

            if samples == 0 {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No trajectories recorded (is dynamics enabled?)",
                    egui::FontId::proportional(16.0),
                    egui::Color32::GRAY,
                );
                return;
            }

            // Fit every recorded point into the canvas
            let projected: Vec<Vec<egui::Vec2>> = recording
                .tracks
                .iter()
                .map(|t| t.points.iter().map(|p| self.project(dims, *p)).collect())
                .collect();
            let mut bounds = egui::Rect::NOTHING;
            for point in projected.iter().flatten() {
                bounds.extend_with(point.to_pos2());
            }
            let extent = bounds.width().max(bounds.height()).max(f32::EPSILON);
            let scale = rect.width().min(rect.height()) * 0.9 / extent;
            let to_screen = |p: egui::Vec2| rect.center() + (p - bounds.center().to_vec2()) * scale;

            for (index, (track, points)) in recording.tracks.iter().zip(&projected).enumerate() {
                let color = PALETTE[index % PALETTE.len()];

                if self.show_trails && points.len() > 1 {
                    let trail: Vec<egui::Pos2> = points.iter().map(|p| to_screen(*p)).collect();
                    painter.add(egui::Shape::line(trail, egui::Stroke::new(1.5, color)));
                }

                if let Some(point) = points.get(self.frame.min(points.len().saturating_sub(1))) {
                    let screen_pos = to_screen(*point);
                    painter.circle_filled(screen_pos, 6.0, color);
                    painter.text(
                        screen_pos + egui::vec2(0.0, 10.0),
                        egui::Align2::CENTER_TOP,
                        &track.name,
                        egui::FontId::default(),
                        egui::Color32::WHITE,
                    );
                }
            }
        });

        if self.playing {
            (self.frame, self.frame_carry) =
                advance_playback(self.frame, self.frame_carry, self.speed_multiplier, last_frame);
            if self.frame >= last_frame {
                self.playing = false;
            }
            ctx.request_repaint();
        }
    }
}
