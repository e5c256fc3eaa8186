use hexagon_tiles::{
    color::{ColorMapType, PALETTE_SIZE},
    gpu_grid::shader_source,
    grid::ROW_HEIGHT,
};
use naga::{
    valid::{Capabilities, ValidationFlags, Validator},
    Literal, ShaderStage,
};

const PIPELINES: &[(&str, ColorMapType)] = &[
    ("gradient", ColorMapType::Gradient),
    ("palette", ColorMapType::Palette),
];

fn parse(name: &str, color_map_type: ColorMapType) -> naga::Module {
    let source = shader_source(color_map_type);
    naga::front::wgsl::parse_str(&source)
        .unwrap_or_else(|err| panic!("{name} shader failed to parse: {}", err.emit_to_string(&source)))
}

#[test]
fn pipeline_shaders_parse_and_validate() {
    for &(name, color_map_type) in PIPELINES {
        let module = parse(name, color_map_type);
        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .unwrap_or_else(|err| panic!("{name} shader failed validation: {err:?}"));
    }
}

#[test]
fn pipeline_shaders_expose_both_stages() {
    for &(name, color_map_type) in PIPELINES {
        let module = parse(name, color_map_type);
        let stage = |entry: &str| {
            module.entry_points.iter()
                .find(|point| point.name == entry)
                .map(|point| point.stage)
        };

        assert_eq!(stage("vs_main"), Some(ShaderStage::Vertex), "{name} has no vertex entry point");
        assert_eq!(stage("fs_main"), Some(ShaderStage::Fragment), "{name} has no fragment entry point");
    }
}

#[test]
fn pipeline_shaders_share_the_uniform_layout() {
    for &(name, color_map_type) in PIPELINES {
        let module = parse(name, color_map_type);
        let mut bindings: Vec<u32> = module.global_variables.iter()
            .filter_map(|(_, var)| var.binding.as_ref())
            .inspect(|binding| assert_eq!(binding.group, 0, "{name} binds outside group 0"))
            .map(|binding| binding.binding)
            .collect();
        bindings.sort_unstable();

        assert_eq!(bindings, vec![0, 1, 2], "{name} uses unexpected bindings");
    }
}

fn constant(module: &naga::Module, name: &str) -> Literal {
    let constant = module.constants.iter()
        .map(|(_, constant)| constant)
        .find(|constant| constant.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no constant named {name}"));

    match module.const_expressions[constant.init] {
        naga::Expression::Literal(literal) => literal,
        ref other => panic!("{name} is not a literal: {other:?}"),
    }
}

#[test]
fn row_height_matches_grid_layout() {
    for &(name, color_map_type) in PIPELINES {
        let module = parse(name, color_map_type);

        match constant(&module, "ROW_HEIGHT") {
            Literal::F32(value) => assert!((value - ROW_HEIGHT).abs() <= f32::EPSILON, "{name}: {value} != {ROW_HEIGHT}"),
            other => panic!("{name}: ROW_HEIGHT has type {other:?}"),
        }
    }
}

#[test]
fn palette_bounds_match_palette_size() {
    let module = parse("palette", ColorMapType::Palette);

    assert_eq!(constant(&module, "PALETTE_MAX"), Literal::F32((PALETTE_SIZE - 1) as f32));
    assert_eq!(constant(&module, "PALETTE_LAST"), Literal::U32((PALETTE_SIZE - 1) as u32));
}
