use centiflake::{FlakeId, Settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let generator = Settings::new().with_ids(0, 0).build()?;

    let id = generator.try_next_id()?;
    println!("{} {} {:?}", id, id.to_padded_string(), id.decompose());

    // The layout is a total transform: the largest non-negative value
    // decomposes to every field's maximum.
    let max = FlakeId::from_raw(9_223_372_036_854_775_807);
    println!("{} {:?}", max, max.decompose());

    Ok(())
}
