use image::{Rgba, RgbaImage};
use rust_meme_frame::config::Configuration;
use rust_meme_frame::controller::{Controller, Controls, Phase};
use rust_meme_frame::processing::captions::CaptionFont;
use rust_meme_frame::speech::Voice;

fn controller() -> Option<Controller> {
    let cfg = Configuration::default();
    let font = match CaptionFont::load(&cfg.font) {
        Ok(font) => font,
        Err(err) => {
            // Headless machines without a single installed font can't
            // exercise caption drawing; everything else is covered anyway.
            eprintln!("skipping: {err}");
            return None;
        }
    };
    Some(Controller::new(&cfg, font))
}

fn sample_image() -> RgbaImage {
    RgbaImage::from_pixel(100, 50, Rgba([180, 40, 40, 255]))
}

fn voice(name: &str) -> Voice {
    Voice {
        name: name.to_string(),
        lang: "en-US".to_string(),
    }
}

#[test]
fn starts_idle_with_everything_disabled() {
    let Some(controller) = controller() else {
        return;
    };
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(
        controller.controls(),
        Controls {
            generate: false,
            clear: false,
            read_aloud: false,
            voice_select: false,
        }
    );
    assert!(controller.image().is_none());
}

#[test]
fn decoded_image_enables_generate_only() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();

    assert_eq!(controller.phase(), Phase::ImageReady);
    let controls = controller.controls();
    assert!(controls.generate);
    assert!(!controls.clear && !controls.read_aloud && !controls.voice_select);

    // 2:1 image on the 800x600 canvas letterboxes above and below
    let canvas = controller.canvas();
    assert_eq!(canvas.dimensions(), (800, 600));
    assert_eq!(canvas.get_pixel(400, 20).0, [0, 0, 0, 255]);
    assert_ne!(canvas.get_pixel(400, 300).0, [0, 0, 0, 255]);
}

#[test]
fn captions_before_any_image_are_rejected() {
    let Some(mut controller) = controller() else {
        return;
    };
    assert!(controller.submit_captions("TOP", "BOTTOM").is_err());
    assert_eq!(controller.phase(), Phase::Idle);
}

#[test]
fn submitted_captions_enable_clear_and_read_aloud() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("TOP TEXT", "BOTTOM TEXT").unwrap();

    assert_eq!(controller.phase(), Phase::CaptionsRendered);
    let controls = controller.controls();
    assert!(!controls.generate);
    assert!(controls.clear && controls.read_aloud && controls.voice_select);
    assert_eq!(controller.captions().unwrap().top, "TOP TEXT");
}

#[test]
fn captions_paint_pixels_on_the_canvas() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("HELLO", "WORLD").unwrap();

    let canvas = controller.canvas();
    let near_white =
        |p: &Rgba<u8>| p.0[0] > 200 && p.0[1] > 200 && p.0[2] > 200;
    let top_band_hit = (0..canvas.width())
        .flat_map(|x| (0..60).map(move |y| (x, y)))
        .any(|(x, y)| near_white(canvas.get_pixel(x, y)));
    let bottom_band_hit = (0..canvas.width())
        .flat_map(|x| (canvas.height() - 60..canvas.height()).map(move |y| (x, y)))
        .any(|(x, y)| near_white(canvas.get_pixel(x, y)));
    assert!(top_band_hit, "top caption left no fill pixels");
    assert!(bottom_band_hit, "bottom caption left no fill pixels");
}

#[test]
fn double_generate_is_rejected() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("A", "B").unwrap();
    assert!(controller.submit_captions("C", "D").is_err());
    assert_eq!(controller.phase(), Phase::CaptionsRendered);
    assert_eq!(controller.captions().unwrap().top, "A");
}

#[test]
fn reset_is_rejected_before_captions_render() {
    let Some(mut controller) = controller() else {
        return;
    };
    assert!(controller.reset().is_err());
    controller.image_decoded(sample_image()).unwrap();
    assert!(controller.reset().is_err());
    assert_eq!(controller.phase(), Phase::ImageReady);
}

#[test]
fn reset_returns_to_idle_and_clears_everything() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("TOP", "BOTTOM").unwrap();
    controller.reset().unwrap();

    assert_eq!(controller.phase(), Phase::Idle);
    assert!(controller.image().is_none());
    assert!(controller.captions().is_none());
    assert!(
        controller
            .canvas()
            .pixels()
            .all(|p| p.0 == [0, 0, 0, 255])
    );
}

#[test]
fn new_image_supersedes_rendered_captions() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("TOP", "BOTTOM").unwrap();

    controller
        .image_decoded(RgbaImage::from_pixel(50, 100, Rgba([40, 40, 180, 255])))
        .unwrap();
    assert_eq!(controller.phase(), Phase::ImageReady);
    assert!(controller.captions().is_none());
    assert!(controller.controls().generate);
}

#[test]
fn read_aloud_queues_top_before_bottom_with_voice_and_volume() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.voices_changed(vec![voice("Zoe"), voice("Alice")]);
    assert!(controller.select_voice("Zoe"));
    controller.set_volume_level(50);

    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("TOP", "BOTTOM").unwrap();

    let [first, second] = controller.read_aloud().unwrap();
    assert_eq!(first.text, "TOP");
    assert_eq!(second.text, "BOTTOM");
    assert!((first.volume - 0.5).abs() < f32::EPSILON);
    assert_eq!(first.voice.as_ref().unwrap().name, "Zoe");
    assert_eq!(second.voice, first.voice);
}

#[test]
fn read_aloud_is_rejected_without_rendered_captions() {
    let Some(mut controller) = controller() else {
        return;
    };
    assert!(controller.read_aloud().is_err());
    controller.image_decoded(sample_image()).unwrap();
    assert!(controller.read_aloud().is_err());
}

#[test]
fn empty_captions_still_advance_the_phase() {
    let Some(mut controller) = controller() else {
        return;
    };
    controller.image_decoded(sample_image()).unwrap();
    controller.submit_captions("", "").unwrap();
    assert_eq!(controller.phase(), Phase::CaptionsRendered);
}
