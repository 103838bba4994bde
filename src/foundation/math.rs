pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn premul_rgba8(rgba: [u8; 4]) -> [u8; 4] {
    let [r, g, b, a] = rgba;
    let a16 = u16::from(a);
    let premul = |c: u8| -> u8 { mul_div255_u16(u16::from(c), a16) as u8 };
    [premul(r), premul(g), premul(b), a]
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
