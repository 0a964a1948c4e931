use std::marker::PhantomData;

#[derive(Debug)]
pub struct DefaultValues<'a> {
    /// https://stackoverflow.com/questions/40484154/parameter-a-is-never-used-error-when-a-is-used-in-type-parameter-bound
    // Causes the type to function *as though* it has a `&'a ()` field,
    // despite not *actually* having one.
    _marker: PhantomData<&'a ()>,
}

impl DefaultValues<'static> {
    /// One delay step; a bit takes three of them, which keeps CLK under 250 kHz.
    pub const TM1637_DELAY_US: u16 = 2;
    /// Uncalibrated placeholder for `SpinDelay`.
    pub const TM1637_SPINS_PER_US: u32 = 40;
    pub const TM1637_THREAD_DELAY_MS: u64 = 1000;
    pub const TM1637_CLK_GPIO: u16 = 27;
    pub const TM1637_DIO_GPIO: u16 = 13;
}
