//! このモジュールは、libclang が返す (先頭ポインタ, 要素数) の組を
//! コピーせずに境界チェック付きで参照するビューを提供します。
use crate::error::ViewError;
use std::fmt;
use std::marker::PhantomData;

/// 連続領域への所有しないビュー。
///
/// 領域の寿命は `'a` で表される所有者 (翻訳単位・トークン配列・補完結果など) が管理します。
/// 要素数は構築後に変化しません。
pub struct BoundedView<'a, T> {
    base: *const T,
    len: usize,
    _owner: PhantomData<&'a [T]>,
}

impl<'a, T> BoundedView<'a, T> {
    /// 単一のネイティブ呼び出しが返した (ポインタ, 要素数) からビューを作成します。
    /// `base` が null の場合は長さ 0 のビューになります。
    ///
    /// # Safety
    /// `base` から `len` 個の `T` が `'a` の間有効でなければなりません。
    pub(crate) unsafe fn from_raw_parts(base: *const T, len: usize) -> Self {
        Self {
            base,
            len: if base.is_null() { 0 } else { len },
            _owner: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `index` の要素を返します。`[0, len)` の外は `ViewError::OutOfRange` です。
    ///
    /// 負の添字も折り返さずに拒否します。
    pub fn at(&self, index: i64) -> Result<&'a T, ViewError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .ok_or(ViewError::OutOfRange {
                index,
                len: self.len,
            })
    }

    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.as_slice().get(index)
    }

    /// 要素数を検証せずに参照します。
    ///
    /// # Safety
    /// `index < self.len()` でなければなりません。
    pub unsafe fn at_unchecked(&self, index: usize) -> &'a T {
        unsafe { &*self.base.add(index) }
    }

    pub fn as_slice(&self) -> &'a [T] {
        if self.len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.base, self.len) }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.as_slice().iter()
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.base
    }
}

impl<T> Clone for BoundedView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BoundedView<'_, T> {}

impl<'a, T> IntoIterator for BoundedView<'a, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for BoundedView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedView")
            .field("base", &self.base)
            .field("len", &self.len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_accepts_exactly_the_valid_range() {
        let data = [10u32, 20, 30];
        let view = unsafe { BoundedView::from_raw_parts(data.as_ptr(), data.len()) };
        assert_eq!(view.len(), 3);
        for i in 0..3 {
            assert_eq!(*view.at(i).unwrap(), data[i as usize]);
        }
        for bad in [-1, -3, 3, 4, i64::MIN, i64::MAX] {
            assert_eq!(
                view.at(bad),
                Err(ViewError::OutOfRange { index: bad, len: 3 })
            );
        }
    }

    #[test]
    fn null_base_is_empty() {
        let view: BoundedView<'_, u8> = unsafe { BoundedView::from_raw_parts(std::ptr::null(), 5) };
        assert!(view.is_empty());
        assert_eq!(view.at(0), Err(ViewError::OutOfRange { index: 0, len: 0 }));
        assert_eq!(view.iter().count(), 0);
    }

    #[test]
    fn iterates_without_copying() {
        let data = [1u8, 2, 3, 4];
        let view = unsafe { BoundedView::from_raw_parts(data.as_ptr(), 2) };
        let collected: Vec<u8> = view.into_iter().copied().collect();
        assert_eq!(collected, vec![1, 2]);
        assert!(std::ptr::eq(view.as_slice().as_ptr(), data.as_ptr()));
        assert_eq!(unsafe { *view.at_unchecked(1) }, 2);
    }
}
