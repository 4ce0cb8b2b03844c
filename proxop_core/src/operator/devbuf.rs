use alloc::vec::Vec;
use core::mem::size_of;
use core::ops::{Deref, DerefMut};
use crate::operator::OpError;

/// Device-resident array.
///
/// Exclusively owned by the block or prox that allocated it,
/// and returned to the device when dropped.
#[derive(Debug)] // NOTE: Do not derive clone, a buffer is never aliased between operators.
pub struct DevBuf<T>
{
    data: Vec<T>,
}

impl<T: Copy> DevBuf<T>
{
    fn alloc(len: usize) -> Result<Vec<T>, OpError>
    {
        let mut data = Vec::new();
        if data.try_reserve_exact(len).is_err() {
            log::error!("device allocation of {} bytes failed", len.saturating_mul(size_of::<T>()));
            return Err(OpError::AllocFailure);
        }
        Ok(data)
    }

    /// Allocates and uploads a copy of `host`.
    pub fn upload(host: &[T]) -> Result<Self, OpError>
    {
        let mut data = Self::alloc(host.len())?;
        data.extend_from_slice(host);

        Ok(DevBuf {data})
    }

    /// Allocates `len` elements set to `value`.
    pub fn filled(len: usize, value: T) -> Result<Self, OpError>
    {
        let mut data = Self::alloc(len)?;
        data.resize(len, value);

        Ok(DevBuf {data})
    }

    /// Bytes held on the device.
    pub fn mem_bytes(&self) -> usize
    {
        self.data.len() * size_of::<T>()
    }
}

impl<T> Deref for DevBuf<T>
{
    type Target = [T];
    fn deref(&self) -> &Self::Target {&self.data}
}

impl<T> DerefMut for DevBuf<T>
{
    fn deref_mut(&mut self) -> &mut Self::Target {&mut self.data}
}

impl<T> AsRef<[T]> for DevBuf<T>
{
    fn as_ref(&self) -> &[T] {&self.data}
}

//

#[test]
fn test_devbuf1()
{
    let b = DevBuf::upload(&[1_i32, 2, 3]).unwrap();
    assert_eq!(b.mem_bytes(), 12);
    assert_eq!(&b[..], &[1, 2, 3]);

    let mut z = DevBuf::filled(4, 0_f64).unwrap();
    z[2] = 5.;
    assert_eq!(z.mem_bytes(), 32);
    assert_eq!(&z[..], &[0., 0., 5., 0.]);
}
