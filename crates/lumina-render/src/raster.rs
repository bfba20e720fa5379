//! tiny-skia based software renderer.

use crate::filters::apply_filters;
use crate::renderer::{RenderContext, RenderResult, RenderedFrame, Renderer, RendererError};
use image::{RgbaImage, imageops};
use kurbo::{Affine, BezPath, PathEl, Rect, Shape as KurboShape};
use lumina_core::shapes::{Image, Shadow, Text};
use lumina_core::{SceneObject, SerializableColor, Shape};
use tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

/// Software renderer producing straight RGBA frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkiaRenderer;

impl SkiaRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_object(&self, pixmap: &mut Pixmap, object: &SceneObject, base: Affine, scale: f64) {
        if let Some(shadow) = Shadow::effective(object.shadow.as_ref()) {
            self.render_shadow(pixmap, object, shadow, base, scale);
        }
        self.render_body(pixmap, object, base, None);
    }

    /// Draw the object. With `tint`, every painted pixel uses that color
    /// instead, which gives the silhouette used for shadows.
    fn render_body(&self, pixmap: &mut Pixmap, object: &SceneObject, base: Affine, tint: Option<SerializableColor>) {
        match &object.shape {
            Shape::Image(image) => self.render_image(pixmap, object, image, base, tint),
            Shape::Text(text) => self.render_text(pixmap, object, text, base, tint),
            _ => self.render_path(pixmap, object, base, tint),
        }
    }

    fn render_path(&self, pixmap: &mut Pixmap, object: &SceneObject, base: Affine, tint: Option<SerializableColor>) {
        let geometry = &object.geometry;
        let style = &object.style;
        let opacity = style.opacity();
        let local = object.shape.local_path(geometry.width, geometry.height);

        if object.shape.is_closed() {
            if let Some(fill) = style.fill {
                let color = tint.unwrap_or(fill).with_opacity(opacity);
                if let Some(path) = to_skia_path(&local) {
                    pixmap.fill_path(
                        &path,
                        &paint_for(color),
                        FillRule::Winding,
                        to_transform(base * geometry.transform()),
                        None,
                    );
                }
            }
        }

        if style.stroke_width > 0.0 {
            // Stroke the scaled outline so the line width is not scaled with the object.
            let scaled = Affine::scale_non_uniform(geometry.scale_x, geometry.scale_y) * local;
            let color = tint.unwrap_or(style.stroke).with_opacity(opacity);
            let round = matches!(object.shape, Shape::Freehand(_));
            let stroke = Stroke {
                width: style.stroke_width as f32,
                line_cap: if round { LineCap::Round } else { LineCap::Butt },
                line_join: if round { LineJoin::Round } else { LineJoin::Miter },
                ..Default::default()
            };
            if let Some(path) = to_skia_path(&scaled) {
                pixmap.stroke_path(
                    &path,
                    &paint_for(color),
                    &stroke,
                    to_transform(base * geometry.placement()),
                    None,
                );
            }
        }
    }

    fn render_image(
        &self,
        pixmap: &mut Pixmap,
        object: &SceneObject,
        image: &Image,
        base: Affine,
        tint: Option<SerializableColor>,
    ) {
        let geometry = &object.geometry;
        let transform = base * geometry.transform();
        let bounds = Rect::new(0.0, 0.0, geometry.width, geometry.height);

        if let Some(color) = tint {
            fill_rect(pixmap, bounds, color.with_opacity(object.style.opacity()), transform);
            return;
        }

        let Some(mut decoded) = decode_image(image) else {
            render_image_placeholder(pixmap, bounds, transform);
            return;
        };
        apply_filters(&mut decoded, &image.filters);
        let (width, height) = decoded.dimensions();
        let Some(source) = rgba_to_pixmap(decoded) else {
            render_image_placeholder(pixmap, bounds, transform);
            return;
        };

        let fit = Affine::scale_non_uniform(geometry.width / width as f64, geometry.height / height as f64);
        let paint = PixmapPaint {
            opacity: object.style.opacity() as f32,
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, to_transform(transform * fit), None);
    }

    /// Text is drawn as one bar per line, sized from the layout metrics.
    /// Glyph shaping is left to hosts with a font stack.
    fn render_text(
        &self,
        pixmap: &mut Pixmap,
        object: &SceneObject,
        text: &Text,
        base: Affine,
        tint: Option<SerializableColor>,
    ) {
        let geometry = &object.geometry;
        let style = &object.style;
        let transform = base * geometry.transform();
        let color = tint
            .or(style.fill)
            .unwrap_or(style.stroke)
            .with_opacity(style.opacity());

        let lines: Vec<&str> = text.content.lines().collect();
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if widest == 0 {
            return;
        }
        let mut line_count = lines.len().max(1);
        if text.content.ends_with('\n') {
            line_count += 1;
        }
        let line_height = geometry.height / line_count as f64;
        let char_width = geometry.width / widest as f64;

        for (i, line) in lines.iter().enumerate() {
            let chars = line.chars().count();
            if chars == 0 {
                continue;
            }
            let top = i as f64 * line_height;
            let width = chars as f64 * char_width;
            let band = Rect::new(0.0, top + line_height * 0.3, width, top + line_height * 0.75);
            fill_rect(pixmap, band, color, transform);
            if text.underline {
                let thickness = (text.font_size / 15.0).max(1.0);
                let baseline = top + line_height * 0.85;
                fill_rect(pixmap, Rect::new(0.0, baseline, width, baseline + thickness), color, transform);
            }
        }
    }

    fn render_shadow(&self, pixmap: &mut Pixmap, object: &SceneObject, shadow: &Shadow, base: Affine, scale: f64) {
        let Some(mut layer) = Pixmap::new(pixmap.width(), pixmap.height()) else {
            return;
        };
        let offset = base * Affine::translate((shadow.offset_x, shadow.offset_y));
        self.render_body(&mut layer, object, offset, Some(shadow.color));

        // Blur radius is two standard deviations.
        let sigma = (shadow.blur * scale / 2.0) as f32;
        let layer = if sigma >= 0.1 {
            match blur_pixmap(layer, sigma) {
                Some(blurred) => blurred,
                None => return,
            }
        } else {
            layer
        };
        pixmap.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }
}

impl Renderer for SkiaRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RenderedFrame> {
        let (width, height) = ctx.pixel_size();
        let mut pixmap = Pixmap::new(width, height).ok_or(RendererError::InvalidSize { width, height })?;
        let background = ctx.scene.background;
        pixmap.fill(Color::from_rgba8(background.r, background.g, background.b, background.a));

        let base = Affine::scale(ctx.scale);
        for object in ctx.scene.objects_by_paint_order() {
            self.render_object(&mut pixmap, object, base, ctx.scale);
        }
        log::debug!(
            "Rendered {} objects at {}x{}",
            ctx.scene.len(),
            width,
            height
        );
        Ok(frame_from_pixmap(&pixmap))
    }
}

fn to_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => pb.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32),
            PathEl::CurveTo(p1, p2, p3) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn paint_for(color: SerializableColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn fill_rect(pixmap: &mut Pixmap, rect: Rect, color: SerializableColor, transform: Affine) {
    if let Some(path) = to_skia_path(&rect.to_path(0.1)) {
        pixmap.fill_path(&path, &paint_for(color), FillRule::Winding, to_transform(transform), None);
    }
}

/// Gray box with a cross, for images that fail to decode.
fn render_image_placeholder(pixmap: &mut Pixmap, bounds: Rect, transform: Affine) {
    fill_rect(pixmap, bounds, SerializableColor::new(200, 200, 200, 255), transform);

    let mut cross = BezPath::new();
    cross.move_to((bounds.x0, bounds.y0));
    cross.line_to((bounds.x1, bounds.y1));
    cross.move_to((bounds.x1, bounds.y0));
    cross.line_to((bounds.x0, bounds.y1));
    let stroke = Stroke {
        width: 2.0,
        ..Default::default()
    };
    if let Some(path) = to_skia_path(&cross) {
        let paint = paint_for(SerializableColor::new(150, 150, 150, 255));
        pixmap.stroke_path(&path, &paint, &stroke, to_transform(transform), None);
    }
}

fn decode_image(image: &Image) -> Option<RgbaImage> {
    let bytes = image.data()?;
    match ::image::load_from_memory(&bytes) {
        Ok(decoded) => Some(decoded.to_rgba8()),
        Err(err) => {
            log::warn!("Failed to decode image: {err}");
            None
        }
    }
}

/// Straight RGBA to a premultiplied pixmap.
fn rgba_to_pixmap(image: RgbaImage) -> Option<Pixmap> {
    let (width, height) = image.dimensions();
    let mut data = image.into_raw();
    for px in data.chunks_exact_mut(4) {
        let alpha = px[3] as u16;
        for c in &mut px[..3] {
            *c = ((*c as u16 * alpha + 127) / 255) as u8;
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(width, height)?)
}

/// Gaussian blur over premultiplied pixels.
fn blur_pixmap(pixmap: Pixmap, sigma: f32) -> Option<Pixmap> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let buffer = RgbaImage::from_raw(width, height, pixmap.take())?;
    let mut data = imageops::blur(&buffer, sigma).into_raw();
    for px in data.chunks_exact_mut(4) {
        let alpha = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(alpha);
        }
    }
    Pixmap::from_vec(data, IntSize::from_wh(width, height)?)
}

fn frame_from_pixmap(pixmap: &Pixmap) -> RenderedFrame {
    let rgba_data = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RenderedFrame {
        rgba_data,
        width: pixmap.width(),
        height: pixmap.height(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use lumina_core::shapes::{ImageFormat, ObjectStyle};
    use lumina_core::{ImageFilter, ObjectAttrs, Scene};
    use pretty_assertions::assert_eq;

    fn render(scene: &Scene) -> RenderedFrame {
        SkiaRenderer::new().render(&RenderContext::new(scene)).unwrap()
    }

    fn red() -> SerializableColor {
        SerializableColor::new(255, 0, 0, 255)
    }

    fn small_scene() -> Scene {
        Scene::new(Size::new(40.0, 40.0), SerializableColor::white())
    }

    fn png_bytes(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba(px));
        let mut out = std::io::Cursor::new(Vec::new());
        image.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_empty_scene_is_background() {
        let mut scene = small_scene();
        scene.set_background(SerializableColor::new(10, 20, 30, 255));
        let frame = render(&scene);
        assert_eq!((frame.width, frame.height), (40, 40));
        assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(39, 39), Some([10, 20, 30, 255]));
        assert_eq!(frame.pixel(40, 0), None);
    }

    #[test]
    fn test_filled_rect() {
        let mut scene = small_scene();
        let style = ObjectStyle::new(Some(red()), red(), 0.0);
        scene
            .create_object(Shape::Rect, ObjectAttrs::at(Point::new(10.0, 10.0), 20.0, 20.0).with_style(style))
            .unwrap();
        let frame = render(&scene);
        assert_eq!(frame.pixel(20, 20), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_paint_order() {
        let mut scene = small_scene();
        let blue = SerializableColor::new(0, 0, 255, 255);
        let attrs = ObjectAttrs::at(Point::new(0.0, 0.0), 40.0, 40.0);
        let bottom = scene
            .create_object(Shape::Rect, attrs.clone().with_style(ObjectStyle::new(Some(red()), red(), 0.0)))
            .unwrap();
        scene
            .create_object(Shape::Rect, attrs.with_style(ObjectStyle::new(Some(blue), blue, 0.0)))
            .unwrap();
        assert_eq!(render(&scene).pixel(20, 20), Some([0, 0, 255, 255]));

        scene.bring_to_front(bottom).unwrap();
        assert_eq!(render(&scene).pixel(20, 20), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_scale_doubles_output() {
        let scene = small_scene();
        let frame = SkiaRenderer::new()
            .render(&RenderContext::new(&scene).with_scale(2.0))
            .unwrap();
        assert_eq!((frame.width, frame.height), (80, 80));
    }

    #[test]
    fn test_zero_size_is_error() {
        let scene = Scene::new(Size::new(0.0, 10.0), SerializableColor::white());
        let result = SkiaRenderer::new().render(&RenderContext::new(&scene));
        assert!(matches!(result, Err(RendererError::InvalidSize { width: 0, height: 10 })));
    }

    #[test]
    fn test_shadow_is_painted_under_object() {
        let mut scene = small_scene();
        let style = ObjectStyle::new(Some(red()), red(), 0.0);
        let shadow = Shadow {
            enabled: true,
            color: SerializableColor::black(),
            blur: 0.0,
            offset_x: 10.0,
            offset_y: 10.0,
        };
        let attrs = ObjectAttrs::at(Point::new(5.0, 5.0), 20.0, 20.0)
            .with_style(style)
            .with_shadow(shadow);
        let id = scene.create_object(Shape::Rect, attrs).unwrap();
        let frame = render(&scene);
        assert_eq!(frame.pixel(15, 15), Some([255, 0, 0, 255]));
        assert_eq!(frame.pixel(30, 30), Some([0, 0, 0, 255]));

        // Disabled shadows are not drawn.
        let patch = lumina_core::ObjectPatch {
            shadow: Some(Some(Shadow { enabled: false, ..shadow })),
            ..Default::default()
        };
        scene.update_object(id, &patch).unwrap();
        assert_eq!(render(&scene).pixel(30, 30), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_image_with_filters() {
        let mut scene = small_scene();
        let bytes = png_bytes(4, 4, [200, 100, 0, 255]);
        let mut payload = Image::new(Image::data_uri(ImageFormat::Png, &bytes), 4, 4, ImageFormat::Png);
        payload.filters = vec![ImageFilter::Invert];
        scene
            .create_object(
                Shape::Image(payload),
                ObjectAttrs::at(Point::ZERO, 0.0, 0.0).with_scale(10.0, 10.0),
            )
            .unwrap();
        let frame = render(&scene);
        assert_eq!(frame.pixel(20, 20), Some([55, 155, 255, 255]));
    }

    #[test]
    fn test_undecodable_image_draws_placeholder() {
        let mut scene = small_scene();
        let payload = Image::new("data:image/png;base64,AAAA", 10, 10, ImageFormat::Png);
        scene
            .create_object(Shape::Image(payload), ObjectAttrs::at(Point::ZERO, 0.0, 0.0))
            .unwrap();
        assert_eq!(render(&scene).pixel(5, 1), Some([200, 200, 200, 255]));
    }

    #[test]
    fn test_render_does_not_touch_scene() {
        let mut scene = small_scene();
        scene
            .create_object(Shape::Ellipse, ObjectAttrs::at(Point::new(2.0, 2.0), 30.0, 30.0))
            .unwrap();
        let before = scene.to_snapshot().unwrap();
        render(&scene);
        assert_eq!(scene.to_snapshot().unwrap(), before);
    }
}
