use chromaglow::border::lut::Rgb;
use chromaglow::border::model::{BorderSegment, Edge};
use chromaglow::border::raster::{PixelRect, RasterSurface};
use chromaglow::border::surface::SegmentSurface;

const KEY: Rgb = Rgb::new(1, 1, 1);

fn segment(x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) -> BorderSegment {
    BorderSegment {
        x1,
        y1,
        x2,
        y2,
        color,
        edge: Edge::Top,
        distance: 0.0,
    }
}

#[test]
fn new_surface_is_filled_with_the_key() {
    let surface = RasterSurface::new(8, 6, KEY);
    for y in 0..6 {
        for x in 0..8 {
            assert_eq!(surface.pixel(x, y), KEY);
        }
    }
}

#[test]
fn present_paints_and_hide_restores_the_key() {
    let red = Rgb::new(240, 20, 20);
    let mut surface = RasterSurface::new(20, 10, KEY);
    let slot = surface.create_slot();
    surface.set_segment(slot, &segment(2.0, 1.0, 5.0, 5.0, red));
    surface.present();

    assert_eq!(surface.pixel(2, 1), red);
    assert_eq!(surface.pixel(4, 4), red);
    assert_eq!(surface.pixel(5, 4), KEY);
    assert_eq!(surface.slots().visible_count(), 1);

    surface.hide(slot);
    surface.present();
    assert_eq!(surface.pixel(2, 1), KEY);
    assert_eq!(surface.slots().visible_count(), 0);
    assert_eq!(surface.presented_frames(), 2);
}

#[test]
fn moved_slot_erases_its_old_position() {
    let blue = Rgb::new(20, 20, 240);
    let mut surface = RasterSurface::new(20, 10, KEY);
    let slot = surface.create_slot();
    surface.set_segment(slot, &segment(0.0, 0.0, 3.0, 4.0, blue));
    surface.present();
    surface.set_segment(slot, &segment(10.0, 0.0, 13.0, 4.0, blue));
    surface.present();

    assert_eq!(surface.pixel(1, 1), KEY);
    assert_eq!(surface.pixel(11, 1), blue);
}

#[test]
fn segments_outside_the_surface_are_clipped() {
    let green = Rgb::new(20, 240, 20);
    let mut surface = RasterSurface::new(10, 10, KEY);
    let slot = surface.create_slot();
    surface.set_segment(slot, &segment(-5.0, 8.0, 3.0, 14.0, green));
    surface.present();
    assert_eq!(surface.pixel(0, 9), green);
    assert_eq!(surface.pixel(2, 8), green);
    assert_eq!(surface.pixel(3, 8), KEY);

    let off = PixelRect {
        x0: 20,
        y0: 0,
        x1: 30,
        y1: 5,
    };
    assert_eq!(off.clip(10, 10), None);
}

#[test]
fn fractional_neighbours_leave_no_gap() {
    let c = Rgb::new(100, 150, 200);
    let mut surface = RasterSurface::new(12, 4, KEY);
    let width = 10.0 / 3.0;
    for i in 0..3 {
        let slot = surface.create_slot();
        let a = i as f32 * width;
        surface.set_segment(slot, &segment(a, 0.0, a + width, 4.0, c));
    }
    surface.present();
    for x in 0..10 {
        assert_eq!(surface.pixel(x, 0), c, "gap at x={x}");
    }
}
