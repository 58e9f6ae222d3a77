use std::io;
use crate::tileset::{FillMode, ObjectAlignment, Properties, PropertyType, Tile, TileRenderSize, Tileset, Transformations};

impl Tileset {

    /// Serializes this tileset in the layout the editor itself writes.
    /// A file saved by the editor and parsed unchanged writes back byte for byte.
    pub fn write_string(&self) -> String {
        let mut w = XmlWriter::new();
        self.write_xml(&mut w);
        w.finish()
    }

    pub fn write_to(&self, mut out: impl io::Write) -> io::Result<()> {
        out.write_all(self.write_string().as_bytes())
    }

    fn write_xml(&self, w: &mut XmlWriter) {
        w.start("tileset");
        if !self.version.is_empty() {
            w.attr("version", &self.version);
        }
        if !self.tiled_version.is_empty() {
            w.attr("tiledversion", &self.tiled_version);
        }
        w.attr("name", &self.name);
        if let Some(class) = &self.class {
            w.attr("class", class);
        }
        w.attr("tilewidth", self.tile_width);
        w.attr("tileheight", self.tile_height);
        if self.spacing != 0 {
            w.attr("spacing", self.spacing);
        }
        if self.margin != 0 {
            w.attr("margin", self.margin);
        }
        w.attr("tilecount", self.tile_count);
        w.attr("columns", self.columns);
        if self.object_alignment != ObjectAlignment::Unspecified {
            w.attr("objectalignment", self.object_alignment.as_str());
        }
        if self.tile_render_size != TileRenderSize::Tile {
            w.attr("tilerendersize", self.tile_render_size.as_str());
        }
        if self.fill_mode != FillMode::Stretch {
            w.attr("fillmode", self.fill_mode.as_str());
        }

        if let Some(offset) = &self.tile_offset {
            w.start("tileoffset");
            w.attr("x", offset.x);
            w.attr("y", offset.y);
            w.end();
        }
        if let Some(grid) = &self.grid {
            w.start("grid");
            w.attr("orientation", grid.orientation.as_str());
            w.attr("width", grid.width);
            w.attr("height", grid.height);
            w.end();
        }
        if let Some(transformations) = &self.transformations {
            w.start("transformations");
            for (name, flag) in Transformations::ATTRIBUTES {
                w.attr(name, u8::from(transformations.contains(flag)));
            }
            w.end();
        }
        write_properties(w, &self.properties);
        if let Some(image) = &self.image {
            w.start("image");
            if let Some(format) = &image.format {
                w.attr("format", format);
            }
            w.attr("source", &image.source);
            if let Some(trans) = &image.trans {
                w.attr("trans", trans);
            }
            if let Some(width) = image.width {
                w.attr("width", width);
            }
            if let Some(height) = image.height {
                w.attr("height", height);
            }
            w.end();
        }

        let class_attribute = if self.uses_class_attribute() { "class" } else { "type" };
        for tile in &self.tiles {
            write_tile(w, tile, class_attribute);
        }
        w.end();
    }
}

fn write_tile(w: &mut XmlWriter, tile: &Tile, class_attribute: &str) {
    w.start("tile");
    w.attr("id", tile.id);
    if let Some(class) = &tile.class {
        w.attr(class_attribute, class);
    }
    if tile.probability != 1.0 {
        w.attr("probability", tile.probability);
    }
    write_properties(w, &tile.properties);

    // Tile images put the size first, unlike tileset images
    if let Some(image) = &tile.image {
        w.start("image");
        if let Some(width) = image.width {
            w.attr("width", width);
        }
        if let Some(height) = image.height {
            w.attr("height", height);
        }
        if let Some(format) = &image.format {
            w.attr("format", format);
        }
        w.attr("source", &image.source);
        if let Some(trans) = &image.trans {
            w.attr("trans", trans);
        }
        w.end();
    }
    if let Some(animation) = &tile.animation {
        w.start("animation");
        for frame in animation.iter() {
            w.start("frame");
            w.attr("tileid", frame.tile_id);
            w.attr("duration", frame.duration);
            w.end();
        }
        w.end();
    }
    w.end();
}

fn write_properties(w: &mut XmlWriter, properties: &Properties) {
    if properties.is_empty() {
        return;
    }
    w.start("properties");
    for property in properties {
        w.start("property");
        w.attr("name", &property.name);
        if property.ty != PropertyType::String {
            w.attr("type", property.ty.as_str());
        }
        if let Some(custom_type) = &property.custom_type {
            w.attr("propertytype", custom_type);
        }
        if !property.members.is_empty() {
            write_properties(w, &property.members);
        }
        else if property.value.contains('\n') {
            w.text(&property.value);
        }
        else if !property.value.is_empty() || property.custom_type.is_none() {
            w.attr("value", &property.value);
        }
        w.end();
    }
    w.end();
}

/// Streaming XML writer producing one element per line with single-space indentation.
struct XmlWriter {
    out: String,
    stack: Vec<OpenElement>,
}

struct OpenElement {
    name: &'static str,
    has_children: bool,
    has_text: bool,
}

impl XmlWriter {

    fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            stack: Vec::new(),
        }
    }

    fn start(&mut self, name: &'static str) {
        if let Some(parent) = self.stack.last_mut() {
            if !parent.has_children {
                self.out.push_str(">\n");
                parent.has_children = true;
            }
        }
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        self.stack.push(OpenElement { name, has_children: false, has_text: false });
    }

    fn attr(&mut self, name: &str, value: impl ToString) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        escape_into(&mut self.out, &value.to_string(), true);
        self.out.push('"');
    }

    fn text(&mut self, text: &str) {
        if let Some(element) = self.stack.last_mut() {
            element.has_text = true;
        }
        self.out.push('>');
        escape_into(&mut self.out, text, false);
    }

    fn end(&mut self) {
        let Some(element) = self.stack.pop() else { return };
        if element.has_text {
            self.out.push_str("</");
            self.out.push_str(element.name);
            self.out.push_str(">\n");
        }
        else if element.has_children {
            self.indent();
            self.out.push_str("</");
            self.out.push_str(element.name);
            self.out.push_str(">\n");
        }
        else {
            self.out.push_str("/>\n");
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.stack.len() {
            self.out.push(' ');
        }
    }

    fn finish(mut self) -> String {
        while !self.stack.is_empty() {
            self.end();
        }
        self.out
    }
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::tileset::{Animation, Frame, Image, Property, PropertyType, Tile, Tileset, Transformations};

    const DETAILS: &str = include_str!("../../assets/tilesets/Stronghold Details.tsx");
    const ANIMATIONS: &str = include_str!("../../assets/tilesets/Stronghold Animations.tsx");

    #[test]
    fn rewrites_editor_files_unchanged() {
        for source in [DETAILS, ANIMATIONS] {
            let tileset = Tileset::parse_str(source).unwrap();
            assert_eq!(source, tileset.write_string());
        }
    }

    #[test]
    fn write_built_tileset() {
        let mut tileset = Tileset::new("Torches", 64, 16);
        tileset.tiled_version = String::from("1.6.0");
        tileset.tile_count = 1;
        tileset.transformations = Some(Transformations::ROTATE);
        let mut torch = Tile::new(0);
        torch.class = Some(String::from("Light & Fire"));
        torch.image = Some(Image::new("Torch \"lit\".png", 64, 16));
        torch.properties.insert_property(Property::typed("radius", PropertyType::Int, "3"));
        torch.animation = Some([Frame::new(0, 100)].into_iter().collect::<Animation>());
        tileset.tiles.push(torch);
        tileset.tiles.push(Tile::new(1));

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.5" tiledversion="1.6.0" name="Torches" tilewidth="64" tileheight="16" tilecount="1" columns="0">
 <transformations hflip="0" vflip="0" rotate="1" preferuntransformed="0"/>
 <tile id="0" type="Light &amp; Fire">
  <properties>
   <property name="radius" type="int" value="3"/>
  </properties>
  <image width="64" height="16" source="Torch &quot;lit&quot;.png"/>
  <animation>
   <frame tileid="0" duration="100"/>
  </animation>
 </tile>
 <tile id="1"/>
</tileset>
"#;
        let written = tileset.write_string();
        assert_eq!(expected, written);
        assert_eq!(tileset, Tileset::parse_str(&written).unwrap());
    }

    #[test]
    fn class_attribute_and_multiline_text() {
        let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.9" tiledversion="1.9.2" name="Terrain" tilewidth="16" tileheight="16" spacing="2" margin="1" tilecount="12" columns="4" objectalignment="bottom">
 <properties>
  <property name="note">walls &amp; floors
second line</property>
 </properties>
 <image source="terrain.png" trans="ff00ff" width="70" height="52"/>
 <tile id="3" class="Wall" probability="0.5"/>
</tileset>
"#;
        let tileset = Tileset::parse_str(source).unwrap();
        assert_eq!(source, tileset.write_string());
    }

    #[test]
    fn type_attribute_after_1_9() {
        let source = r#"<?xml version="1.0" encoding="UTF-8"?>
<tileset version="1.10" tiledversion="1.10.2" name="Props" class="Furniture" tilewidth="16" tileheight="16" tilecount="1" columns="0">
 <tile id="0" type="Door">
  <image width="16" height="32" source="door.png"/>
 </tile>
</tileset>
"#;
        let tileset = Tileset::parse_str(source).unwrap();
        assert_eq!(Some("Door"), tileset.tiles[0].class.as_deref());
        assert_eq!(source, tileset.write_string());
    }

    #[test]
    fn write_to_io() {
        let tileset = Tileset::parse_str(ANIMATIONS).unwrap();
        let mut bytes = Vec::new();
        tileset.write_to(&mut bytes).unwrap();
        assert_eq!(ANIMATIONS.as_bytes(), bytes.as_slice());
    }
}
