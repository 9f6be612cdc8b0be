//! Вспомогательные функции для OpenCL

use super::types::*;
use crate::error::ClError;
use std::ffi::c_void;
use std::ptr;

/// Превращает код возврата OpenCL в `Result`
pub fn check(call: &'static str, code: cl_int) -> Result<(), ClError> {
    if code == CL_SUCCESS {
        Ok(())
    } else {
        Err(ClError { call, code })
    }
}

/// Проверяет результат функции `clCreate*`
pub fn created(call: &'static str, obj: *mut c_void, code: cl_int) -> Result<*mut c_void, ClError> {
    check(call, code)?;
    if obj.is_null() {
        return Err(ClError { call, code: CL_INVALID_VALUE });
    }
    Ok(obj)
}

/// Читает строковый параметр `clGet*Info`: сначала размер, затем данные
pub fn query_string<F>(call: &'static str, mut query: F) -> Result<String, ClError>
where
    F: FnMut(usize, *mut c_void, *mut usize) -> cl_int,
{
    let mut size = 0usize;
    check(call, query(0, ptr::null_mut(), &mut size))?;
    if size == 0 {
        return Ok(String::new());
    }

    let mut value = vec![0u8; size];
    check(call, query(size, value.as_mut_ptr().cast(), ptr::null_mut()))?;
    Ok(from_c_bytes(&value))
}

/// Преобразует null-terminated массив байт из C в строку
pub fn from_c_bytes(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_string()
}
