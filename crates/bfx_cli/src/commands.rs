//! Subcommand implementations

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bfx_player::{
    FrameCollector, FrameState, HeadlessDriver, PlayerConfig, RenderSink, TimelinePlayer,
    Transport, MAX_FPS,
};
use bfx_scene::{Scene, SceneLoad, SceneLoader};

/// Load a scene, turning an unavailable scene into a user-facing error
pub fn load_scene(path: &Path) -> Result<Arc<Scene>> {
    match SceneLoader::load_or_unavailable(path) {
        SceneLoad::Ready(scene) => Ok(scene),
        SceneLoad::Unavailable { reason } => anyhow::bail!("Scene unavailable: {}", reason),
    }
}

/// Display name of a scene: its id, else its title, else the file name
fn scene_label(scene: &Scene, path: &Path) -> String {
    [scene.id.as_str(), scene.title.as_str()]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
        })
}

pub fn validate(path: &Path) -> Result<()> {
    let scene = load_scene(path)?;
    println!("{}", validate_summary(&scene, path));
    Ok(())
}

fn validate_summary(scene: &Scene, path: &Path) -> String {
    format!(
        "{} is valid: {:.2}s, {}x{}, {} elements, {} markers",
        scene_label(scene, path),
        scene.duration,
        scene.width,
        scene.height,
        scene.elements.len(),
        scene.markers.len()
    )
}

pub fn sample(path: &Path, at: f64, pretty: bool) -> Result<()> {
    let scene = load_scene(path)?;
    let frame = sample_frame(scene, at)?;
    write_frame(&frame, pretty)
}

fn sample_frame(scene: Arc<Scene>, at: f64) -> Result<FrameState> {
    let mut player = TimelinePlayer::new(scene)?;
    player.seek(at);
    Ok(player.frame())
}

/// Outcome of a headless playthrough
#[derive(Clone, Debug, PartialEq)]
pub struct PlayReport {
    pub label: String,
    pub ticks: usize,
    pub fps: f64,
    pub speed: f64,
}

impl fmt::Display for PlayReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Played {} to the end in {} frames at {} fps (speed {})",
            self.label, self.ticks, self.fps, self.speed
        )
    }
}

pub fn play(path: &Path, config: PlayerConfig, quiet: bool) -> Result<()> {
    let scene = load_scene(path)?;
    let label = scene_label(&scene, path);

    let report = if quiet {
        play_scene(scene, label, config, None::<FrameCollector>)?
    } else {
        play_scene(
            scene,
            label,
            config,
            Some(|frame: &FrameState| {
                if let Err(e) = write_frame(frame, false) {
                    tracing::warn!("Failed to write frame: {}", e);
                }
            }),
        )?
    };

    tracing::debug!("{}", report);
    if quiet {
        println!("{}", report);
    }
    Ok(())
}

/// Play `scene` to the end on a headless driver, presenting frames to `sink`.
fn play_scene<S>(
    scene: Arc<Scene>,
    label: String,
    config: PlayerConfig,
    sink: Option<S>,
) -> Result<PlayReport>
where
    S: RenderSink + Send + 'static,
{
    anyhow::ensure!(
        config.fps.is_finite() && config.fps > 0.0,
        "fps must be a positive number, got {}",
        config.fps
    );
    anyhow::ensure!(
        config.fps <= MAX_FPS,
        "fps must be at most {}, got {}",
        MAX_FPS,
        config.fps
    );
    anyhow::ensure!(
        config.speed.is_finite(),
        "speed must be a finite number, got {}",
        config.speed
    );

    let fps = config.fps;
    let mut player = TimelinePlayer::new(scene)?.with_config(config);
    if let Some(sink) = sink {
        player.set_sink(sink);
    }

    let ticks = HeadlessDriver::new(fps).run(&mut player);

    Ok(PlayReport {
        label,
        ticks,
        fps,
        speed: player.speed(),
    })
}

pub fn markers(path: &Path, at: f64, epsilon: f64) -> Result<()> {
    let scene = load_scene(path)?;
    print!("{}", markers_report(scene, at, epsilon)?);
    Ok(())
}

fn markers_report(scene: Arc<Scene>, at: f64, epsilon: f64) -> Result<String> {
    let mut player =
        TimelinePlayer::new(scene)?.with_config(PlayerConfig::default().with_marker_epsilon(epsilon));
    player.seek(at);

    let position = player.current_time();
    let nav = player.markers();
    let mut out = String::new();

    for marker in nav.sorted() {
        let here = (marker.time - position).abs() <= epsilon;
        out.push_str(&format!(
            "{} {:>6.3}  {:<16} {}\n",
            if here { ">" } else { " " },
            marker.time,
            marker.id,
            marker.name
        ));
    }

    match nav.previous(position) {
        Some(m) => out.push_str(&format!("previous: {} ({:.3})\n", m.id, m.time)),
        None => out.push_str("previous: start (0.000)\n"),
    }
    match nav.next(position) {
        Some(m) => out.push_str(&format!("next: {} ({:.3})\n", m.id, m.time)),
        None => out.push_str("next: none\n"),
    }
    Ok(out)
}

fn frame_json(frame: &FrameState, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(frame)
    } else {
        serde_json::to_string(frame)
    }
    .context("Failed to serialize frame")
}

fn write_frame(frame: &FrameState, pretty: bool) -> Result<()> {
    let json = frame_json(frame, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write frame")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = r##"{
        "title": "Fade",
        "duration": 4,
        "elements": [
            { "id": "title", "type": "text", "enter": 0, "exit": 0.5,
              "keyframes": [
                { "time": 0, "properties": { "opacity": 0 } },
                { "time": 0.25, "properties": { "opacity": 1 } }
              ] }
        ],
        "markers": [
            { "id": "intro", "name": "Intro", "time": 0.0 },
            { "id": "middle", "name": "Middle", "time": 0.5 },
            { "id": "end", "name": "End", "time": 0.9 }
        ]
    }"##;

    fn scene() -> Arc<Scene> {
        Arc::new(SceneLoader::from_json_str(SCENE).unwrap())
    }

    #[test]
    fn test_missing_scene_is_unavailable() {
        let err = load_scene(Path::new("/nonexistent/scene.json")).unwrap_err();
        assert!(err.to_string().starts_with("Scene unavailable:"));
    }

    #[test]
    fn test_validate_label_falls_back() {
        let path = Path::new("decks/fade.json");
        let summary = validate_summary(&scene(), path);
        assert!(summary.starts_with("Fade is valid: 4.00s"), "{}", summary);

        let untitled = Scene::new("", 2.0);
        let summary = validate_summary(&untitled, path);
        assert!(summary.starts_with("fade.json is valid"), "{}", summary);

        let mut named = Scene::new("Fade", 2.0);
        named.id = "fade-v2".to_string();
        assert!(validate_summary(&named, path).starts_with("fade-v2 is valid"));
    }

    #[test]
    fn test_sample_frame_json() {
        let frame = sample_frame(scene(), 0.125).unwrap();
        assert_eq!(frame.get("title").and_then(|e| e.number("opacity")), Some(0.5));

        let json: serde_json::Value =
            serde_json::from_str(&frame_json(&frame, false).unwrap()).unwrap();
        assert_eq!(json["time"], 0.125);
        assert_eq!(json["elements"][0]["id"], "title");
        assert_eq!(json["elements"][0]["properties"]["opacity"], 0.5);

        let frame = sample_frame(scene(), 0.75).unwrap();
        assert!(frame.is_empty());
    }

    #[test]
    fn test_play_presents_every_frame() {
        let frames = FrameCollector::new();
        let config = PlayerConfig::default().with_fps(4.0);

        let report = play_scene(scene(), "fade".to_string(), config, Some(frames.clone())).unwrap();

        assert_eq!(report.ticks, 16);
        assert_eq!(frames.len(), 16);
        assert_eq!(frames.last().map(|f| f.time), Some(1.0));
    }

    #[test]
    fn test_play_speed_override() {
        let config = PlayerConfig::default().with_fps(4.0).with_speed(2.0);
        let report =
            play_scene(scene(), "fade".to_string(), config, None::<FrameCollector>).unwrap();

        assert_eq!(report.ticks, 8);
        assert_eq!(report.speed, 2.0);
        assert_eq!(
            report.to_string(),
            "Played fade to the end in 8 frames at 4 fps (speed 2)"
        );
    }

    #[test]
    fn test_play_rejects_unusable_fps() {
        for fps in [f64::INFINITY, f64::NAN, 0.0, -5.0, 1e9] {
            let config = PlayerConfig::default().with_fps(fps);
            assert!(
                play_scene(scene(), "fade".to_string(), config, None::<FrameCollector>).is_err(),
                "fps {}",
                fps
            );
        }
    }

    #[test]
    fn test_markers_report() {
        let report = markers_report(scene(), 0.5, 0.01).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with(">"), "{}", lines[1]);
        assert!(lines[1].contains("middle"));
        assert!(lines[0].starts_with(" "));
        assert_eq!(lines[3], "previous: intro (0.000)");
        assert_eq!(lines[4], "next: end (0.900)");

        let report = markers_report(scene(), 0.95, 0.01).unwrap();
        assert!(report.ends_with("next: none\n"));
    }
}
