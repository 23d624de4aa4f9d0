//! A recorded plot replays to exactly the pixels of a direct render.
//!
//! Run: cargo test --test plot_buffer_test

#![allow(clippy::unwrap_used)]

use shadeplot::config::DeviceOptions;
use shadeplot::demos::{render_atlas, ShadedFieldDemo};
use shadeplot::device::{Device, PlotBuffer, RasterDevice, SvgDevice};
use shadeplot::stream::PlotStream;

fn options() -> DeviceOptions {
    DeviceOptions {
        width: 240,
        height: 180,
        ..DeviceOptions::default()
    }
}

fn draw_field<D: Device>(device: D) -> D {
    let mut pls = PlotStream::new(device, &options()).unwrap();
    pls.init().unwrap();
    let demo = ShadedFieldDemo::new(14, 17, 6).unwrap().with_contours(true);
    demo.render(&mut pls).unwrap();
    pls.end().unwrap();
    pls.into_device()
}

fn draw_atlas<D: Device>(device: D) -> D {
    let mut pls = PlotStream::new(device, &options()).unwrap();
    pls.init().unwrap();
    render_atlas(&mut pls).unwrap();
    pls.end().unwrap();
    pls.into_device()
}

#[test]
fn replayed_field_matches_direct_raster() {
    let direct = draw_field(RasterDevice::in_memory());
    let buffer = draw_field(PlotBuffer::new());

    let mut replayed = RasterDevice::in_memory();
    buffer.replay(&mut replayed).unwrap();

    assert_eq!(direct.pages().len(), 4);
    assert_eq!(replayed.pages().len(), 4);
    for (a, b) in direct.pages().iter().zip(replayed.pages()) {
        assert_eq!(a, b);
    }
}

#[test]
fn replayed_atlas_matches_direct_svg() {
    let direct = draw_atlas(SvgDevice::in_memory());
    let buffer = draw_atlas(PlotBuffer::new());

    let mut replayed = SvgDevice::in_memory();
    buffer.replay(&mut replayed).unwrap();
    assert_eq!(direct.documents(), replayed.documents());
    assert_eq!(buffer.page_count(), 17);
}

#[test]
fn cleared_buffer_replays_nothing() {
    let mut buffer = draw_field(PlotBuffer::new());
    assert!(buffer.fill_count() > 0);
    buffer.clear();

    let mut device = RasterDevice::in_memory();
    buffer.replay(&mut device).unwrap();
    assert!(device.pages().is_empty());
}
