#![feature(test)]
/// Notes
/// 1. Every transform bench has 10,000 conversions
/// 2. Points are around Beijing, i.e. inside China, so offsets are applied

extern crate test;

use test::Bencher;

use coordtrans::transform::{
    bd09_to_wgs84, gcj02_to_wgs84, gcj02_to_wgs84_exact, wgs84_to_bd09, wgs84_to_gcj02,
};
use coordtrans::{convert_batch, Coordinate, CoordinateSystem};

const REPEAT: usize = 500;
const POINTS: [Coordinate; 20] = [
    Coordinate::new(116.40739587318592, 39.90419989217468),
    Coordinate::new(116.39127531728491, 39.90600312859013),
    Coordinate::new(116.30815632188753, 39.99295782910221),
    Coordinate::new(116.46953180127433, 39.86844093264501),
    Coordinate::new(116.38413617273182, 39.92310532859126),
    Coordinate::new(116.58512891374205, 40.07999203018251),
    Coordinate::new(116.27394671235011, 39.89923508312871),
    Coordinate::new(116.43171906624832, 39.94117358734915),
    Coordinate::new(116.35508420613377, 39.86071219630244),
    Coordinate::new(116.49922837120841, 39.91553016270381),
    Coordinate::new(116.32004726305166, 39.95833421507717),
    Coordinate::new(116.41890521713055, 39.88012634178269),
    Coordinate::new(116.22873904315827, 39.93147260863512),
    Coordinate::new(116.45126637890452, 39.97731008614324),
    Coordinate::new(116.37702185162917, 40.00582146283915),
    Coordinate::new(116.51063317219584, 39.83619024157683),
    Coordinate::new(116.29458903177106, 39.84721398526137),
    Coordinate::new(116.40068127733614, 40.03144728619032),
    Coordinate::new(116.34319746029613, 39.92881670014529),
    Coordinate::new(116.47612084215307, 39.95409857231668),
];

macro_rules! impl_bench {
    ($name:ident, $f:ident) => {
        #[bench]
        fn $name(b: &mut Bencher) {
            let mut ps = Vec::with_capacity(POINTS.len() * REPEAT);
            for _ in 0..REPEAT {
                ps.extend(POINTS);
            }

            b.iter(|| {
                let _ = ps.iter().map(|p| $f(*p)).collect::<Vec<_>>();
            });
        }
    };
}

impl_bench!(bench_wgs84_to_gcj02, wgs84_to_gcj02);
impl_bench!(bench_gcj02_to_wgs84, gcj02_to_wgs84);
impl_bench!(bench_gcj02_to_wgs84_exact, gcj02_to_wgs84_exact);
impl_bench!(bench_wgs84_to_bd09, wgs84_to_bd09);
impl_bench!(bench_bd09_to_wgs84, bd09_to_wgs84);

#[bench]
fn batch(b: &mut Bencher) {
    let text = POINTS
        .iter()
        .map(|p| format!("{}, {}", p.latitude, p.longitude))
        .collect::<Vec<_>>()
        .join("\n");

    b.iter(|| {
        let _ = convert_batch(&text, CoordinateSystem::Wgs84);
    });
}
